//! Version-control access layer.
//!
//! Everything under this module talks to the repository exclusively by
//! spawning `git` subprocesses (see `gateway::VcsGateway`); no other part of
//! the crate opens repository files directly.

pub mod gateway;
pub mod graph;
pub mod types;

pub use gateway::VcsGateway;
pub use graph::GraphQueries;
pub use types::{BranchName, Oid, TreeId};
