use std::collections::{BTreeMap, BTreeSet};

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::UserEvent;
use crate::error::DomainError;
use crate::value_objects::Fingerprint;

/// Fingerprints of every event already counted.
///
/// Persisted as a JSON object whose keys are the fingerprints and whose values
/// are `null`. Values are ignored on load. Keys serialize in sorted order, so
/// rewriting an unchanged index produces identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupIndex {
    seen: BTreeSet<Fingerprint>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint_of(event: &UserEvent) -> Result<Fingerprint, DomainError> {
        Fingerprint::of(event)
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains(fingerprint)
    }

    /// Returns `false` if the fingerprint was already present.
    pub fn add(&mut self, fingerprint: Fingerprint) -> bool {
        self.seen.insert(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl FromIterator<Fingerprint> for DedupIndex {
    fn from_iter<I: IntoIterator<Item = Fingerprint>>(iter: I) -> Self {
        Self {
            seen: iter.into_iter().collect(),
        }
    }
}

impl Serialize for DedupIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.seen.iter().map(|fingerprint| (fingerprint.as_str(), ())))
    }
}

impl<'de> Deserialize<'de> for DedupIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<Fingerprint, IgnoredAny>::deserialize(deserializer)?;
        Ok(entries.into_keys().collect())
    }
}
