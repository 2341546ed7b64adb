use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("failed to serialize event for fingerprint: {0}")]
    Hash(#[source] serde_json::Error),
    #[error("invalid fingerprint {0:?}: expected 64 lowercase hex characters")]
    InvalidFingerprint(String),
    #[error("timestamp {0} is outside the supported calendar range")]
    Timestamp(i64),
    #[error("event type {0:?} collides with a summary key field")]
    ReservedEventType(String),
    #[error("counter {event_type:?} for user {user_id} on {date} would exceed u64::MAX")]
    CounterOverflow {
        user_id: i64,
        date: String,
        event_type: String,
    },
}
