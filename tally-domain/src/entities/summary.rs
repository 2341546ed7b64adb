// Daily summary entity
// Per-user, per-date event type counters and the ordered store holding them

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value_objects::SummaryKey;

/// Names that would collide with the key fields once counters are flattened
/// into the persisted object.
pub const RESERVED_COUNTER_NAMES: [&str; 2] = ["userId", "date"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub user_id: i64,
    pub date: String,
    #[serde(flatten)]
    pub counts: IndexMap<String, u64>,
}

impl DailySummary {
    pub fn new(key: SummaryKey) -> Self {
        Self {
            user_id: key.user_id,
            date: key.date,
            counts: IndexMap::new(),
        }
    }

    pub fn key(&self) -> SummaryKey {
        SummaryKey::new(self.user_id, self.date.clone())
    }

    pub fn count(&self, event_type: &str) -> u64 {
        self.counts.get(event_type).copied().unwrap_or(0)
    }

    pub fn set_count(&mut self, event_type: &str, count: u64) {
        if let Some(slot) = self.counts.get_mut(event_type) {
            *slot = count;
        } else {
            self.counts.insert(event_type.to_string(), count);
        }
    }
}

/// Ordered collection of daily summaries, at most one per key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryStore {
    summaries: Vec<DailySummary>,
}

impl SummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_summaries(summaries: Vec<DailySummary>) -> Self {
        Self { summaries }
    }

    pub fn summaries(&self) -> &[DailySummary] {
        &self.summaries
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Position of each key in the store. The first entry wins if a loaded
    /// store carries duplicates.
    pub fn positions(&self) -> HashMap<SummaryKey, usize> {
        let mut positions = HashMap::with_capacity(self.summaries.len());
        for (slot, summary) in self.summaries.iter().enumerate() {
            positions.entry(summary.key()).or_insert(slot);
        }
        positions
    }

    /// Summary tracked for `key` in `positions`, or a fresh one appended to
    /// the store and recorded there. The flag is `true` for a fresh summary.
    pub fn locate_or_create(
        &mut self,
        positions: &mut HashMap<SummaryKey, usize>,
        key: SummaryKey,
    ) -> (usize, bool, &mut DailySummary) {
        let (slot, created) = match positions.get(&key) {
            Some(&slot) => (slot, false),
            None => {
                self.summaries.push(DailySummary::new(key.clone()));
                let slot = self.summaries.len() - 1;
                positions.insert(key, slot);
                (slot, true)
            }
        };
        (slot, created, &mut self.summaries[slot])
    }
}
