//! Tip and cut-point discovery — reducing a set of branches to the minimal
//! set of tips, and finding each tip's graft boundary onto a target.

use crate::engine::error::EngineError;
use crate::engine::obsolescence::ObsolescenceOracle;
use crate::vcs::graph::GraphQueries;
use crate::vcs::types::{BranchName, Oid};

pub struct TopologyAnalyzer<'a> {
    graph: &'a GraphQueries,
}

impl<'a> TopologyAnalyzer<'a> {
    pub fn new(graph: &'a GraphQueries) -> Self {
        Self { graph }
    }

    /// Reduce `branches` to the subset whose tips no other member of the set
    /// descends from. O(k^2) ancestry probes; sorted and deduplicated.
    pub fn find_tips(&self, branches: &[BranchName]) -> Result<Vec<BranchName>, EngineError> {
        let mut resolved = Vec::with_capacity(branches.len());
        for b in branches {
            resolved.push((b.clone(), self.graph.resolve(b.as_str())?));
        }

        let mut tips = Vec::new();
        for (i, (name, commit)) in resolved.iter().enumerate() {
            let mut is_tip = true;
            for (j, (_, other_commit)) in resolved.iter().enumerate() {
                if i == j {
                    continue;
                }
                if self.graph.is_ancestor(commit, other_commit)? {
                    is_tip = false;
                    break;
                }
            }
            if is_tip {
                tips.push(name.clone());
            }
        }

        tips.sort();
        tips.dedup();
        Ok(tips)
    }

    /// Walk back from `tip` (newest first) and return the first commit
    /// already obsolete in `target`, or `None` if none of the last `max`
    /// commits qualify.
    pub fn find_cut_point(
        &self,
        tip: &Oid,
        target: &Oid,
        oracle: &ObsolescenceOracle,
        max: usize,
    ) -> Result<Option<Oid>, EngineError> {
        let candidates = self.graph.rev_list(target, tip, max)?;
        for candidate in candidates {
            if oracle.is_obsolete(&candidate, target)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}
