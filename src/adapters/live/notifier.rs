//! Live adapters for the `Notifier` port.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::NotifyError;
use crate::ports::notifier::{Notification, Notifier, NotifyFuture};

const USERNAME: &str = "Board Pilot";
const AVATAR_URL: &str =
    "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png";

/// Posts notifications as a single rich embed to a chat webhook.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Creates a notifier posting to `url`, abandoning requests after
    /// `timeout`.
    #[must_use]
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self { client: super::http_client(timeout), url: url.into() }
    }
}

/// Builds the webhook body for a notification.
#[must_use]
pub fn webhook_payload(notification: &Notification) -> Value {
    let fields: Vec<Value> = notification
        .fields
        .iter()
        .map(|f| json!({ "name": f.name, "value": f.value, "inline": f.inline }))
        .collect();
    json!({
        "username": USERNAME,
        "avatar_url": AVATAR_URL,
        "embeds": [{
            "title": notification.title,
            "description": notification.description,
            "color": notification.tone.color(),
            "fields": fields,
            "timestamp": notification.timestamp.to_rfc3339(),
            "footer": { "text": notification.footer },
        }],
    })
}

impl Notifier for WebhookNotifier {
    fn send(&self, notification: &Notification) -> NotifyFuture<'_> {
        let payload = webhook_payload(notification);
        Box::pin(async move {
            let response = self
                .client
                .post(&self.url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| NotifyError::Network(e.to_string()))?;
            match response.status().as_u16() {
                200 | 204 => Ok(()),
                status => Err(NotifyError::Rejected { status }),
            }
        })
    }
}

/// Used when no webhook is configured; drops every notification.
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn send(&self, notification: &Notification) -> NotifyFuture<'_> {
        debug!("event=notify status=disabled title={:?}", notification.title);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::ports::notifier::{NotificationField, Tone};

    fn sample() -> Notification {
        Notification {
            title: "Task completed".into(),
            description: "**Issue:** Fix login".into(),
            tone: Tone::Failure,
            fields: vec![NotificationField { name: "Number".into(), value: "#12".into(), inline: true }],
            timestamp: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
            footer: "Board Pilot - acme/todo".into(),
        }
    }

    #[test]
    fn payload_wraps_notification_in_one_embed() {
        let payload = webhook_payload(&sample());
        let embed = &payload["embeds"][0];

        assert_eq!(payload["username"], USERNAME);
        assert_eq!(embed["title"], "Task completed");
        assert_eq!(embed["color"], Tone::Failure.color());
        assert_eq!(embed["fields"][0]["value"], "#12");
        assert_eq!(embed["timestamp"], "2025-05-01T12:00:00+00:00");
        assert_eq!(embed["footer"]["text"], "Board Pilot - acme/todo");
    }

    #[tokio::test]
    async fn disabled_notifier_accepts_everything() {
        assert!(DisabledNotifier.send(&sample()).await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_webhook_is_a_network_error() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook", Duration::from_secs(5));
        let err = notifier.send(&sample()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Network(_)));
    }
}
