//! In-memory set of item ids seen by a long-running watcher.

use std::collections::HashSet;

use crate::model::ItemId;

/// Result of observing one board read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First read after start: everything was recorded, nothing is new.
    Baseline {
        /// Number of ids recorded.
        recorded: usize,
    },
    /// Ids not seen before, in board order.
    New(Vec<ItemId>),
}

/// Ids seen since the process started. Lost on restart.
#[derive(Debug, Default)]
pub struct KnownItems {
    ids: HashSet<ItemId>,
    baseline_taken: bool,
}

impl KnownItems {
    /// Creates an empty set; the next observation is the baseline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current ids and returns those not seen before.
    ///
    /// Every new id is remembered, eligible or not, so an item is
    /// considered at most once.
    pub fn observe<'a, I>(&mut self, current: I) -> Observation
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        if !self.baseline_taken {
            self.ids.extend(current.into_iter().cloned());
            self.baseline_taken = true;
            return Observation::Baseline { recorded: self.ids.len() };
        }

        let mut new = Vec::new();
        for id in current {
            if self.ids.insert(id.clone()) {
                new.push(id.clone());
            }
        }
        Observation::New(new)
    }

    /// Returns `true` if the id has been seen.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Number of ids seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
