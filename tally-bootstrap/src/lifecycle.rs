use std::path::PathBuf;

use tracing::info;

use tally_application::commands::aggregate_commands::{aggregate_events, AggregateOutcome};
use tally_application::AppError;
use tally_domain::RunMode;

use crate::context::AppContext;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub index: PathBuf,
    pub mode: RunMode,
}

pub fn run_standalone(options: &RunOptions) -> Result<AggregateOutcome, AppError> {
    info!(
        input = %options.input.display(),
        output = %options.output.display(),
        index = %options.index.display(),
        mode = options.mode.as_str(),
        "starting run"
    );
    let context = AppContext::new(options);
    aggregate_events(&context.state, options.mode)
}
