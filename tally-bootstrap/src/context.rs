use std::sync::Arc;

use tally_application::AppState;
use tally_infrastructure::{JsonEventFile, JsonIndexFile, JsonSummaryFile};

use crate::lifecycle::RunOptions;

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub fn new(options: &RunOptions) -> Self {
        let state = AppState {
            event_source: Arc::new(JsonEventFile::new(&options.input)),
            summary_repo: Arc::new(JsonSummaryFile::new(&options.output)),
            index_repo: Arc::new(JsonIndexFile::new(&options.index)),
        };
        Self { state }
    }
}
