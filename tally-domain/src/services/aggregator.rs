use std::collections::HashMap;

use crate::entities::{RunSummary, SummaryStore, UserEvent, RESERVED_COUNTER_NAMES};
use crate::error::DomainError;
use crate::services::DedupIndex;
use crate::utils::date_for_timestamp;
use crate::value_objects::{Fingerprint, RunMode, SummaryKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Aggregated { new_summary: bool },
    SkippedDuplicate,
}

/// Folds events into a summary store while recording their fingerprints.
///
/// In [`RunMode::Update`] an event whose fingerprint is already indexed is
/// skipped. In [`RunMode::Fresh`] every event is counted and the index is only
/// written to, never consulted.
pub struct Aggregator<'a> {
    store: &'a mut SummaryStore,
    index: &'a mut DedupIndex,
    mode: RunMode,
    positions: HashMap<SummaryKey, usize>,
    // (summary slot, event type) -> cumulative count, seeded from the store
    tally: HashMap<(usize, String), u64>,
    summary: RunSummary,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a mut SummaryStore, index: &'a mut DedupIndex, mode: RunMode) -> Self {
        let positions = store.positions();
        Self {
            store,
            index,
            mode,
            positions,
            tally: HashMap::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn fold(&mut self, event: &UserEvent) -> Result<EventOutcome, DomainError> {
        self.summary.received += 1;
        let fingerprint = Fingerprint::of(event)?;
        if self.mode.is_update() && self.index.contains(&fingerprint) {
            self.summary.skipped_duplicates += 1;
            return Ok(EventOutcome::SkippedDuplicate);
        }

        if RESERVED_COUNTER_NAMES.contains(&event.event_type.as_str()) {
            return Err(DomainError::ReservedEventType(event.event_type.clone()));
        }
        let date =
            date_for_timestamp(event.timestamp).ok_or(DomainError::Timestamp(event.timestamp))?;

        let (slot, new_summary, daily) = self
            .store
            .locate_or_create(&mut self.positions, SummaryKey::new(event.user_id, date));
        if new_summary {
            self.summary.new_summaries += 1;
        }
        let count = self
            .tally
            .entry((slot, event.event_type.clone()))
            .or_insert_with(|| daily.count(&event.event_type));
        *count = count
            .checked_add(1)
            .ok_or_else(|| DomainError::CounterOverflow {
                user_id: daily.user_id,
                date: daily.date.clone(),
                event_type: event.event_type.clone(),
            })?;
        daily.set_count(&event.event_type, *count);

        self.index.add(fingerprint);
        self.summary.aggregated += 1;
        Ok(EventOutcome::Aggregated { new_summary })
    }

    pub fn finish(self) -> RunSummary {
        self.summary
    }
}

/// Aggregates a whole batch in input order. Stops at the first failing event;
/// the caller must not persist the partially updated store or index.
pub fn aggregate(
    events: &[UserEvent],
    store: &mut SummaryStore,
    index: &mut DedupIndex,
    mode: RunMode,
) -> Result<RunSummary, DomainError> {
    let mut aggregator = Aggregator::new(store, index, mode);
    for event in events {
        aggregator.fold(event)?;
    }
    Ok(aggregator.finish())
}
