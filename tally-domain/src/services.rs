// Domain services
pub mod aggregator;
pub mod dedup_index;

pub use aggregator::*;
pub use dedup_index::*;
