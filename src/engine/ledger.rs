//! Durable record of items already handled by one-shot runs.
//!
//! Stored as a JSON object mapping item id to the RFC 3339 time the item
//! was first inspected. Entries older than [`RETENTION_DAYS`] are dropped
//! on every save.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};
use log::{debug, warn};
use serde_json::Value;

use crate::error::LedgerError;
use crate::model::ItemId;
use crate::ports::FileSystem;

/// Days an entry is kept after it was first recorded.
pub const RETENTION_DAYS: i64 = 30;

/// Item ids mapped to the time they were first inspected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedLedger {
    entries: BTreeMap<ItemId, DateTime<Utc>>,
}

impl ProcessedLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the ledger at `path`.
    ///
    /// A missing file is a fresh start. An unreadable or corrupt file is
    /// logged and treated as empty so the run can continue.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Self {
        if !fs.exists(path) {
            debug!("event=ledger_load status=absent path={}", path.display());
            return Self::new();
        }
        let raw = match fs.read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("event=ledger_load status=unreadable path={} error={err}", path.display());
                return Self::new();
            }
        };
        match Self::parse(&raw) {
            Ok(ledger) => {
                debug!("event=ledger_load status=ok path={} entries={}", path.display(), ledger.len());
                ledger
            }
            Err(err) => {
                warn!("event=ledger_load status=corrupt path={} error={err}", path.display());
                Self::new()
            }
        }
    }

    /// Parses ledger JSON. Entries whose value is not a timestamp are
    /// skipped one by one.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a JSON object.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let map: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        let mut entries = BTreeMap::new();
        for (id, value) in map {
            match value.as_str().and_then(parse_timestamp) {
                Some(at) => {
                    entries.insert(ItemId::new(id), at);
                }
                None => warn!("event=ledger_entry status=skipped item={id} value={value}"),
            }
        }
        Ok(Self { entries })
    }

    /// Returns `true` if the item was handled before.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.contains_key(id)
    }

    /// When the item was first recorded.
    #[must_use]
    pub fn recorded_at(&self, id: &ItemId) -> Option<DateTime<Utc>> {
        self.entries.get(id).copied()
    }

    /// Records an item. The first timestamp wins.
    pub fn record(&mut self, id: ItemId, at: DateTime<Utc>) {
        self.entries.entry(id).or_insert(at);
    }

    /// Drops entries recorded [`RETENTION_DAYS`] or more before `now`.
    /// Returns how many were dropped.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(RETENTION_DAYS);
        let before = self.entries.len();
        self.entries.retain(|_, at| *at > cutoff);
        before - self.entries.len()
    }

    /// Prunes, then writes the ledger to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if encoding or writing fails. The in-memory
    /// ledger is already pruned either way.
    pub fn save(
        &mut self,
        fs: &dyn FileSystem,
        path: &Path,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let pruned = self.prune(now);
        let json = self.to_json()?;
        fs.write(path, &json)
            .map_err(|e| LedgerError::Write { path: path.to_path_buf(), message: e.to_string() })?;
        debug!(
            "event=ledger_save path={} entries={} pruned={pruned}",
            path.display(),
            self.entries.len()
        );
        Ok(())
    }

    /// Serializes to pretty JSON with RFC 3339 timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        let map: BTreeMap<&str, String> = self
            .entries
            .iter()
            .map(|(id, at)| (id.as_str(), at.to_rfc3339_opts(SecondsFormat::Micros, true)))
            .collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accepts RFC 3339 or a naive ISO-8601 date-time, read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn parse_skips_malformed_entries() {
        let raw = r#"{
            "PVTI_a": "2024-03-01T12:00:00+00:00",
            "PVTI_b": "2024-03-02T08:30:00.123456",
            "PVTI_c": "yesterday",
            "PVTI_d": 17
        }"#;
        let ledger = ProcessedLedger::parse(raw).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.recorded_at(&ItemId::new("PVTI_a")), Some(at(1)));
        assert!(ledger.contains(&ItemId::new("PVTI_b")));
        assert!(!ledger.contains(&ItemId::new("PVTI_c")));
    }

    #[test]
    fn parse_rejects_non_object() {
        assert!(ProcessedLedger::parse("[1, 2]").is_err());
    }

    #[test]
    fn record_keeps_first_timestamp() {
        let mut ledger = ProcessedLedger::new();
        ledger.record(ItemId::new("x"), at(1));
        ledger.record(ItemId::new("x"), at(5));
        assert_eq!(ledger.recorded_at(&ItemId::new("x")), Some(at(1)));
    }

    #[test]
    fn prune_drops_entries_past_retention() {
        let now = Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap();
        let mut ledger = ProcessedLedger::new();
        ledger.record(ItemId::new("old"), now - Duration::days(31));
        ledger.record(ItemId::new("edge"), now - Duration::days(RETENTION_DAYS));
        ledger.record(ItemId::new("recent"), now - Duration::days(29));

        assert_eq!(ledger.prune(now), 2);
        assert!(ledger.contains(&ItemId::new("recent")));
        assert!(!ledger.contains(&ItemId::new("old")));
        assert!(!ledger.contains(&ItemId::new("edge")));
    }

    #[test]
    fn save_prunes_and_round_trips_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("processed_items.json");
        let fs = LiveFileSystem;
        let now = at(30);

        let mut ledger = ProcessedLedger::new();
        ledger.record(ItemId::new("stale"), now - Duration::days(45));
        ledger.record(ItemId::new("fresh"), now);
        ledger.save(&fs, &path, now).unwrap();

        let loaded = ProcessedLedger::load(&fs, &path);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.recorded_at(&ItemId::new("fresh")), Some(now));
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_items.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(ProcessedLedger::load(&LiveFileSystem, &path).is_empty());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(ProcessedLedger::load(&LiveFileSystem, &path).is_empty());
    }
}
