use tracing::{debug, error, info, warn};

use crate::{AppError, AppState};
use tally_domain::{aggregate, DedupIndex, RunMode, RunSummary, SummaryStore};

#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub store: SummaryStore,
    pub summary: RunSummary,
    pub indexed: usize,
}

/// Runs one batch end to end: load, aggregate, then persist summaries and the
/// index. Nothing is written unless every earlier step succeeded.
pub fn aggregate_events(state: &AppState, mode: RunMode) -> Result<AggregateOutcome, AppError> {
    let events = state.event_source.load_events().map_err(|err| {
        error!("failed to load input events: {:#}", err);
        AppError::Parse(err)
    })?;
    info!(events = events.len(), mode = mode.as_str(), "input batch loaded");

    let (mut store, mut index) = if mode.is_update() {
        (load_prior_summaries(state)?, load_prior_index(state)?)
    } else {
        (SummaryStore::new(), DedupIndex::new())
    };

    let summary = aggregate(&events, &mut store, &mut index, mode).map_err(|err| {
        error!("aggregation aborted: {}", err);
        AppError::from(err)
    })?;
    info!(
        received = summary.received,
        aggregated = summary.aggregated,
        skipped_duplicates = summary.skipped_duplicates,
        new_summaries = summary.new_summaries,
        "aggregation finished"
    );

    state
        .summary_repo
        .save_summaries(&store)
        .map_err(AppError::Write)?;
    debug!("summaries persisted: count={}", store.len());
    state.index_repo.save_index(&index).map_err(AppError::Write)?;
    debug!("dedup index persisted: count={}", index.len());

    Ok(AggregateOutcome {
        indexed: index.len(),
        store,
        summary,
    })
}

fn load_prior_summaries(state: &AppState) -> Result<SummaryStore, AppError> {
    match state.summary_repo.load_summaries() {
        Ok(Some(store)) => {
            info!("loaded {} prior summaries", store.len());
            Ok(store)
        }
        Ok(None) => {
            warn!("no prior summaries found, starting from an empty store");
            Ok(SummaryStore::new())
        }
        Err(err) => {
            error!("failed to load prior summaries: {:#}", err);
            Err(AppError::StoreLoad(err))
        }
    }
}

fn load_prior_index(state: &AppState) -> Result<DedupIndex, AppError> {
    match state.index_repo.load_index() {
        Ok(Some(index)) => {
            info!("loaded {} indexed fingerprints", index.len());
            Ok(index)
        }
        Ok(None) => {
            info!("no dedup index found, starting empty");
            Ok(DedupIndex::new())
        }
        Err(err) => {
            error!("failed to load dedup index: {:#}", err);
            Err(AppError::IndexLoad(err))
        }
    }
}
