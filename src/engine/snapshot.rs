//! Immutable record of branch→commit bindings, captured once per batch.

use crate::engine::error::EngineError;
use crate::vcs::graph::GraphQueries;
use crate::vcs::types::{BranchName, Oid};
use std::collections::HashMap;

/// Mapping from branch name to commit id, captured exactly once before any
/// rebase executes and never mutated afterward.
///
/// SyncPointFinder routes every "was this an ancestor?" and "how far apart?"
/// query for sync-point selection through this snapshot rather than through
/// branch names resolved live, because the live graph stops reflecting the
/// original dependency structure as soon as the batch moves the first ref.
#[derive(Debug, Clone)]
pub struct RefSnapshot {
    bindings: HashMap<BranchName, Oid>,
}

impl RefSnapshot {
    /// Resolve every branch in `branches` against the current repository
    /// state, once.
    pub fn capture(graph: &GraphQueries, branches: &[BranchName]) -> Result<Self, EngineError> {
        let mut bindings = HashMap::with_capacity(branches.len());
        for branch in branches {
            let commit = graph.resolve(branch.as_str())?;
            bindings.insert(branch.clone(), commit);
        }
        Ok(Self { bindings })
    }

    pub fn get(&self, branch: &BranchName) -> Option<&Oid> {
        self.bindings.get(branch)
    }

    pub fn branches(&self) -> impl Iterator<Item = &BranchName> {
        self.bindings.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::gateway::VcsGateway;
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GraphQueries) {
        let dir = TempDir::new().unwrap();
        let run = |args: &[&str]| {
            StdCommand::new("git")
                .args(args)
                .current_dir(dir.path())
                .output()
                .unwrap();
        };
        run(&["init", "-q", "-b", "main"]);
        run(&["config", "user.email", "test@example.com"]);
        run(&["config", "user.name", "Test"]);
        std::fs::write(dir.path().join("file.txt"), "one\n").unwrap();
        run(&["add", "."]);
        run(&["commit", "-q", "-m", "initial"]);
        run(&["branch", "f/a"]);

        let gateway = VcsGateway::discover(dir.path()).unwrap();
        (dir, GraphQueries::new(gateway))
    }

    #[test]
    fn test_capture_then_mutate_does_not_change_snapshot() {
        let (dir, graph) = init_repo();
        let branches = vec![BranchName::new("main"), BranchName::new("f/a")];
        let snapshot = RefSnapshot::capture(&graph, &branches).unwrap();
        let original = snapshot.get(&BranchName::new("f/a")).cloned().unwrap();

        std::fs::write(dir.path().join("new.txt"), "x\n").unwrap();
        StdCommand::new("git").args(["add", "."]).current_dir(dir.path()).output().unwrap();
        StdCommand::new("git")
            .args(["checkout", "-q", "f/a"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        StdCommand::new("git")
            .args(["commit", "-q", "-m", "move f/a"])
            .current_dir(dir.path())
            .output()
            .unwrap();

        assert_eq!(snapshot.get(&BranchName::new("f/a")), Some(&original));
        let live = graph.resolve("f/a").unwrap();
        assert_ne!(&live, &original);
    }

    #[test]
    fn test_get_missing_branch_returns_none() {
        let (_dir, graph) = init_repo();
        let snapshot = RefSnapshot::capture(&graph, &[]).unwrap();
        assert_eq!(snapshot.get(&BranchName::new("ghost")), None);
    }
}
