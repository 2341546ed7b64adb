// Domain value objects
pub mod fingerprint;
pub mod identifiers;
pub mod run_mode;

pub use fingerprint::*;
pub use identifiers::*;
pub use run_mode::*;
