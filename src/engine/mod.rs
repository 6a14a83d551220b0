//! The stack rebase engine: obsolescence detection, topology analysis, and
//! topology-preserving rebase orchestration.

pub mod error;
pub mod executor;
pub mod obsolescence;
pub mod snapshot;
pub mod sync_point;
pub mod topology;

pub use error::EngineError;
pub use executor::{Executor, ResultLog, TipOutcome};
