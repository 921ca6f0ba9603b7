use std::collections::{HashMap, VecDeque};

use crate::model::{CanonicalRecord, MatchKey};

/// Multiplicity-aware index over the secondary-side records.
///
/// One FIFO queue per match key; insertion order within a key is the original
/// extraction order. After the build phase the index is only ever consumed:
/// `take` pops the oldest still-available record for a key, and nothing is
/// re-inserted, which makes exactly-once consumption structural.
#[derive(Debug, Default)]
pub struct MatchIndex {
    groups: HashMap<MatchKey, VecDeque<CanonicalRecord>>,
    len: usize,
}

impl MatchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build phase: append a record to its key's queue.
    pub fn push(&mut self, record: CanonicalRecord) {
        self.groups
            .entry(record.match_key())
            .or_default()
            .push_back(record);
        self.len += 1;
    }

    /// Consume the oldest still-available record for `key`, if any.
    pub fn take(&mut self, key: &MatchKey) -> Option<CanonicalRecord> {
        let queue = self.groups.get_mut(key)?;
        let record = queue.pop_front()?;
        if queue.is_empty() {
            self.groups.remove(key);
        }
        self.len -= 1;
        Some(record)
    }

    /// Records never consumed.
    pub fn remaining(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
