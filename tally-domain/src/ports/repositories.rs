use crate::entities::{SummaryStore, UserEvent};
use crate::services::DedupIndex;

pub trait EventSource: Send + Sync {
    fn load_events(&self) -> anyhow::Result<Vec<UserEvent>>;
}

/// Prior summary state. `Ok(None)` means nothing has been persisted yet.
pub trait SummaryRepository: Send + Sync {
    fn load_summaries(&self) -> anyhow::Result<Option<SummaryStore>>;
    fn save_summaries(&self, store: &SummaryStore) -> anyhow::Result<()>;
}

/// Persisted deduplication index. `Ok(None)` means no index exists yet.
pub trait FingerprintRepository: Send + Sync {
    fn load_index(&self) -> anyhow::Result<Option<DedupIndex>>;
    fn save_index(&self, index: &DedupIndex) -> anyhow::Result<()>;
}
