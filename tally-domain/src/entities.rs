// Domain entities
pub mod event;
pub mod run_summary;
pub mod summary;

pub use event::*;
pub use run_summary::*;
pub use summary::*;
