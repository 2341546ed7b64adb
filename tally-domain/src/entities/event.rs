// Event entity
// A single user action read from the input batch

use serde::{Deserialize, Serialize};

/// Field declaration order is the canonical serialization used for
/// fingerprints. Reordering these fields invalidates every persisted index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    pub user_id: i64,
    pub event_type: String,
    pub timestamp: i64,
}

impl UserEvent {
    pub fn new(user_id: i64, event_type: impl Into<String>, timestamp: i64) -> Self {
        Self {
            user_id,
            event_type: event_type.into(),
            timestamp,
        }
    }
}
