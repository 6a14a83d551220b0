//! Deciding whether a commit's content has already landed in a target.

use crate::engine::error::EngineError;
use crate::vcs::gateway::{CherryMarker, MergeTreeResult};
use crate::vcs::graph::GraphQueries;
use crate::vcs::types::Oid;

/// Four-strategy decision procedure for "is this content already upstream."
pub struct ObsolescenceOracle<'a> {
    graph: &'a GraphQueries,
    /// Commits to examine in strategy 3 (historical tree match).
    window: usize,
}

impl<'a> ObsolescenceOracle<'a> {
    pub fn new(graph: &'a GraphQueries, window: usize) -> Self {
        Self { graph, window }
    }

    /// `true` means applying `commit` on top of `target` would introduce no
    /// new content not already present in `target`'s history.
    pub fn is_obsolete(&self, commit: &Oid, target: &Oid) -> Result<bool, EngineError> {
        if self.patch_id_equivalent(commit, target)? {
            return Ok(true);
        }
        if self.merge_tree_equal(commit, target)? {
            return Ok(true);
        }
        if self.historical_tree_match(commit, target)? {
            return Ok(true);
        }
        Ok(false)
    }

    /// Strategy 1: every commit reachable from `commit` but not `target` has
    /// a patch-id equivalent already in `target`'s history.
    fn patch_id_equivalent(&self, commit: &Oid, target: &Oid) -> Result<bool, EngineError> {
        let entries = self.graph.cherry(target, commit)?;
        Ok(!entries.iter().any(|e| e.marker == CherryMarker::Plus))
    }

    /// Strategy 2: merging `commit` into `target` produces `target`'s own
    /// tree unchanged — the squash-merge case.
    fn merge_tree_equal(&self, commit: &Oid, target: &Oid) -> Result<bool, EngineError> {
        match self.graph.merge_tree(target, commit)? {
            MergeTreeResult::Conflict => Ok(false),
            MergeTreeResult::Tree(merged) => {
                let target_tree = self.graph.tree_of(target)?;
                Ok(merged == target_tree)
            }
        }
    }

    /// Strategy 3: `commit`'s tree matches the tree of one of the last
    /// `window` commits on `target` — the revert-then-reapply case.
    fn historical_tree_match(&self, commit: &Oid, target: &Oid) -> Result<bool, EngineError> {
        let commit_tree = self.graph.tree_of(commit)?;

        let mut cursor = target.clone();
        for _ in 0..self.window {
            let tree = self.graph.tree_of(&cursor)?;
            if tree == commit_tree {
                return Ok(true);
            }
            let parent_expr = format!("{cursor}~1");
            match self.graph.resolve(&parent_expr) {
                Ok(parent) => cursor = parent,
                Err(_) => break,
            }
        }
        Ok(false)
    }
}
