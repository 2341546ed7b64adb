use thiserror::Error;

use tally_domain::DomainError;

/// Every variant is terminal for the current run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to parse input events: {0:#}")]
    Parse(anyhow::Error),
    #[error("failed to load persisted summaries: {0:#}")]
    StoreLoad(anyhow::Error),
    #[error("failed to load deduplication index: {0:#}")]
    IndexLoad(anyhow::Error),
    #[error("failed to fingerprint event: {0}")]
    Hash(#[source] DomainError),
    #[error("{0}")]
    Timestamp(#[source] DomainError),
    #[error("{0}")]
    ReservedEventType(#[source] DomainError),
    #[error("{0}")]
    CounterOverflow(#[source] DomainError),
    #[error("failed to persist output: {0:#}")]
    Write(anyhow::Error),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Timestamp(_) => AppError::Timestamp(err),
            DomainError::ReservedEventType(_) => AppError::ReservedEventType(err),
            DomainError::CounterOverflow { .. } => AppError::CounterOverflow(err),
            DomainError::Hash(_) => AppError::Hash(err),
            // Only produced while reading a persisted index.
            DomainError::InvalidFingerprint(_) => AppError::IndexLoad(err.into()),
        }
    }
}
