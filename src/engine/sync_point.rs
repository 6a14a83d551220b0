//! Finding an already-rebased ancestor branch to replay onto, instead of the
//! bare target, so a forking stack's shared prefix is not duplicated.

use crate::engine::error::EngineError;
use crate::engine::snapshot::RefSnapshot;
use crate::vcs::graph::GraphQueries;
use crate::vcs::types::{BranchName, Oid};

/// A branch that has already moved in this batch and sits on `tip`'s
/// original ancestry path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPoint {
    pub sync_branch: BranchName,
    pub old_hash: Oid,
    pub new_hash: Oid,
}

pub struct SyncPointFinder<'a> {
    graph: &'a GraphQueries,
}

impl<'a> SyncPointFinder<'a> {
    pub fn new(graph: &'a GraphQueries) -> Self {
        Self { graph }
    }

    /// Both ancestry and distance are computed against `initial_snapshot`,
    /// never against the live graph — after partial progress the live graph
    /// no longer reflects the original dependency structure.
    pub fn find_sync_point(
        &self,
        tip: &BranchName,
        all_branches: &[BranchName],
        initial_snapshot: &RefSnapshot,
    ) -> Result<Option<SyncPoint>, EngineError> {
        let tip_initial = match initial_snapshot.get(tip) {
            Some(oid) => oid.clone(),
            None => return Ok(None),
        };

        let mut best: Option<(usize, SyncPoint)> = None;

        let mut candidates: Vec<&BranchName> = all_branches.iter().filter(|c| *c != tip).collect();
        candidates.sort();

        for candidate in candidates {
            let old = match initial_snapshot.get(candidate) {
                Some(oid) => oid.clone(),
                None => continue,
            };

            if !self.graph.is_ancestor(&old, &tip_initial)? {
                continue;
            }

            let curr = self.graph.resolve(candidate.as_str())?;
            if curr == old {
                continue;
            }

            let dist = self.graph.rev_list_count(&old, &tip_initial)?;
            let better = match &best {
                None => true,
                Some((best_dist, _)) => dist < *best_dist,
            };
            if better {
                best = Some((
                    dist,
                    SyncPoint {
                        sync_branch: candidate.clone(),
                        old_hash: old,
                        new_hash: curr,
                    },
                ));
            }
        }

        Ok(best.map(|(_, sync_point)| sync_point))
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

        let gateway = VcsGateway::discover(dir.path()).unwrap();
        (dir, GraphQueries::new(gateway))
    }

    fn commit_on(dir: &TempDir, filename: &str, content: &str, message: &str) {
        std::fs::write(dir.path().join(filename), content).unwrap();
        StdCommand::new("git").args(["add", "."]).current_dir(dir.path()).output().unwrap();
        StdCommand::new("git")
            .args(["commit", "-q", "-m", message])
            .current_dir(dir.path())
            .output()
            .unwrap();
    }

    fn branch(dir: &TempDir, name: &str) {
        StdCommand::new("git")
            .args(["checkout", "-q", "-b", name])
            .current_dir(dir.path())
            .output()
            .unwrap();
    }

    #[test]
    fn test_no_sync_point_when_nothing_has_moved() {
        let (dir, graph) = init_repo();
        branch(&dir, "f/a");
        commit_on(&dir, "a.txt", "a\n", "a");
        branch(&dir, "f/b");
        commit_on(&dir, "b.txt", "b\n", "b");

        let all = vec![BranchName::new("f/a"), BranchName::new("f/b")];
        let snapshot = RefSnapshot::capture(&graph, &all).unwrap();
        let finder = SyncPointFinder::new(&graph);
        let result = finder.find_sync_point(&BranchName::new("f/b"), &all, &snapshot).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_sync_point_found_after_ancestor_moves() {
        let (dir, graph) = init_repo();
        branch(&dir, "f/a");
        commit_on(&dir, "a.txt", "a\n", "a");
        branch(&dir, "f/b");
        commit_on(&dir, "b.txt", "b\n", "b");

        let all = vec![BranchName::new("f/a"), BranchName::new("f/b")];
        let snapshot = RefSnapshot::capture(&graph, &all).unwrap();

        // Simulate f/a having already been rebased onto a new base in this batch.
        StdCommand::new("git")
            .args(["checkout", "-q", "f/a"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        std::fs::write(dir.path().join("a.txt"), "a-rebased\n").unwrap();
        StdCommand::new("git")
            .args(["commit", "-q", "--amend", "-m", "a (rebased)"])
            .current_dir(dir.path())
            .output()
            .unwrap();

        let finder = SyncPointFinder::new(&graph);
        let result = finder
            .find_sync_point(&BranchName::new("f/b"), &all, &snapshot)
            .unwrap()
            .unwrap();
        assert_eq!(result.sync_branch, BranchName::new("f/a"));
        assert_eq!(&result.old_hash, snapshot.get(&BranchName::new("f/a")).unwrap());
    }
}
