use std::sync::Arc;

use tally_domain::ports::{EventSource, FingerprintRepository, SummaryRepository};

#[derive(Clone)]
pub struct AppState {
    pub event_source: Arc<dyn EventSource>,
    pub summary_repo: Arc<dyn SummaryRepository>,
    pub index_repo: Arc<dyn FingerprintRepository>,
}
