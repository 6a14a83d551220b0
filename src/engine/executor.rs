//! `Executor`: the top-level batch orchestration loop for `rebase_prefix` and
//! `evolve`, including snapshotting, per-tip strategy selection, conflict
//! abort, and result logging.
//!
//! The batch loop follows the shape of: snapshot → per-tip rebase →
//! conflict short-circuit → restore original branch. Ancestry is derived
//! live from the graph rather than from any persisted parent pointers.

use crate::context::ExecutionContext;
use crate::engine::error::EngineError;
use crate::engine::obsolescence::ObsolescenceOracle;
use crate::engine::snapshot::RefSnapshot;
use crate::engine::sync_point::SyncPointFinder;
use crate::engine::topology::TopologyAnalyzer;
use crate::vcs::gateway::{RebaseOutcome, RebaseRef, RefScope};
use crate::vcs::graph::GraphQueries;
use crate::vcs::types::{BranchName, Oid};

/// Terminal classification of one tip's rebase attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipOutcome {
    Updated,
    Skipped,
    Failed,
}

/// One rendered stack-tree entry in a `ResultLog` bucket.
#[derive(Debug, Clone)]
pub struct LoggedStack {
    pub tip: BranchName,
    pub members: Vec<BranchName>,
}

/// Three disjoint buckets accumulated over a batch.
#[derive(Debug, Clone, Default)]
pub struct ResultLog {
    pub updated: Vec<LoggedStack>,
    pub skipped: Vec<LoggedStack>,
    pub failed: Vec<LoggedStack>,
}

impl ResultLog {
    /// Exit code the batch should report: 0 unless anything failed.
    pub fn exit_code(&self) -> i32 {
        if self.failed.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Strategy actually applied to a tip, recorded for auditability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    SyncPoint,
    CutPoint,
    Plain,
}

pub struct Executor<'a> {
    graph: &'a GraphQueries,
    oracle: ObsolescenceOracle<'a>,
    topology: TopologyAnalyzer<'a>,
    sync_finder: SyncPointFinder<'a>,
    obsolescence_window: usize,
}

impl<'a> Executor<'a> {
    pub fn new(graph: &'a GraphQueries, obsolescence_window: usize) -> Self {
        Self {
            graph,
            oracle: ObsolescenceOracle::new(graph, obsolescence_window),
            topology: TopologyAnalyzer::new(graph),
            sync_finder: SyncPointFinder::new(graph),
            obsolescence_window,
        }
    }

    /// Rebase every stack tip found under `prefix` onto `target`.
    pub fn rebase_prefix(&self, prefix: &str, target_name: &BranchName) -> Result<ResultLog, EngineError> {
        self.graph.gateway().require_minimum_version()?;

        let start_branch = self.graph.current_branch()?;

        self.graph
            .resolve(target_name.as_str())
            .map_err(|_| EngineError::PreconditionFailed(format!("target branch {target_name} does not exist")))?;

        let dry_run = ExecutionContext::is_dry_run();
        if !dry_run {
            self.update_target(target_name)?;
        }
        let target = self.graph.resolve(target_name.as_str())?;

        let all = self.graph.list_refs(prefix, &RefScope::Local)?;
        let all: Vec<BranchName> = all.into_iter().filter(|b| b != target_name).collect();

        if all.is_empty() {
            self.restore_start_branch(&start_branch)?;
            return Err(EngineError::DiscoveryEmpty);
        }

        let initial_snapshot = RefSnapshot::capture(self.graph, &all)?;
        let tips = self.topology.find_tips(&all)?;

        if dry_run {
            self.preview_rebase_prefix(&tips, prefix, &target, target_name, &all, &initial_snapshot)?;
            return Ok(ResultLog::default());
        }

        let mut log = ResultLog::default();
        let mut candidate_delete: Vec<BranchName> = Vec::new();

        for tip in &tips {
            let members = self.graph.branches_merged_into(tip, Some(prefix))?;
            let tip_commit = self.graph.resolve(tip.as_str())?;
            let members = self.order_by_distance(&tip_commit, members)?;

            if self.oracle.is_obsolete(&tip_commit, &target)? {
                log.skipped.push(LoggedStack {
                    tip: tip.clone(),
                    members: members.clone(),
                });
                candidate_delete.extend(members);
                continue;
            }

            match self.attempt_tip_rebase(tip, &tip_commit, &target, target_name, &all, &initial_snapshot)? {
                TipOutcome::Updated => log.updated.push(LoggedStack {
                    tip: tip.clone(),
                    members,
                }),
                TipOutcome::Failed => log.failed.push(LoggedStack {
                    tip: tip.clone(),
                    members,
                }),
                TipOutcome::Skipped => unreachable!("is_obsolete already handled above"),
            }
        }

        // Shared bases must not be deleted: drop anything that also appears
        // in a kept (Updated) or Failed stack.
        let retained: std::collections::HashSet<&BranchName> = log
            .updated
            .iter()
            .chain(log.failed.iter())
            .flat_map(|s| s.members.iter())
            .collect();
        candidate_delete.retain(|b| !retained.contains(b));
        candidate_delete.sort();
        candidate_delete.dedup();

        if !candidate_delete.is_empty() {
            let prompt = format!(
                "Delete {} fully-merged branch(es): {}?",
                candidate_delete.len(),
                candidate_delete
                    .iter()
                    .map(BranchName::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            if crate::ui::prompt::confirm(&prompt).unwrap_or(false) {
                self.graph.gateway().delete_local(&candidate_delete)?;
            }
        }

        self.restore_start_branch(&start_branch)?;
        Ok(log)
    }

    /// Order stack members by ascending `rev_list_count(member, tip)` —
    /// closest to the tip first — for display (spec's stack-tree rendering).
    fn order_by_distance(&self, tip_commit: &Oid, members: Vec<BranchName>) -> Result<Vec<BranchName>, EngineError> {
        let mut with_distance = Vec::with_capacity(members.len());
        for member in members {
            let commit = self.graph.resolve(member.as_str())?;
            let distance = self.graph.rev_list_count(&commit, tip_commit)?;
            with_distance.push((distance, member));
        }
        with_distance.sort_by_key(|(distance, _)| *distance);
        Ok(with_distance.into_iter().map(|(_, member)| member).collect())
    }

    /// Fast-forward `target` to its upstream before any stack is touched.
    /// Skipped entirely when `target` has no configured upstream (e.g. a
    /// local-only trunk) — there is nothing to pull.
    fn update_target(&self, target_name: &BranchName) -> Result<(), EngineError> {
        if self.graph.upstream_of(target_name)?.is_none() {
            return Ok(());
        }

        let before = self.graph.current_branch()?;
        self.graph.checkout(target_name).map_err(|e| {
            EngineError::PreconditionFailed(format!("failed to check out target branch {target_name}: {e}"))
        })?;

        let result = self.graph.gateway().pull_rebase().map_err(|e| {
            EngineError::PreconditionFailed(format!("failed to update target branch {target_name}: {e}"))
        });

        self.restore_start_branch(&before)?;
        result
    }

    /// First-match strategy selection for one tip: sync point, then cut
    /// point, then a plain rebase onto the target.
    fn attempt_tip_rebase(
        &self,
        tip: &BranchName,
        tip_commit: &Oid,
        target: &Oid,
        target_name: &BranchName,
        all_branches: &[BranchName],
        initial_snapshot: &RefSnapshot,
    ) -> Result<TipOutcome, EngineError> {
        let (_strategy, onto, upstream) =
            self.plan_strategy(tip, tip_commit, target, target_name, all_branches, initial_snapshot)?;
        self.run_rebase(tip, onto.as_ref(), upstream.as_ref())
    }

    /// Compute which strategy applies to `tip` without executing it, for
    /// both the real rebase path and the `--dry-run` preview.
    fn plan_strategy(
        &self,
        tip: &BranchName,
        tip_commit: &Oid,
        target: &Oid,
        target_name: &BranchName,
        all_branches: &[BranchName],
        initial_snapshot: &RefSnapshot,
    ) -> Result<(Strategy, Option<RebaseRef>, Option<RebaseRef>), EngineError> {
        if let Some(sync) = self
            .sync_finder
            .find_sync_point(tip, all_branches, initial_snapshot)?
        {
            return Ok((
                Strategy::SyncPoint,
                Some(RebaseRef::Commit(sync.new_hash)),
                Some(RebaseRef::Commit(sync.old_hash)),
            ));
        }

        if let Some(cut) = self
            .topology
            .find_cut_point(tip_commit, target, &self.oracle, self.obsolescence_window)?
        {
            return Ok((
                Strategy::CutPoint,
                Some(RebaseRef::Branch(target_name.clone())),
                Some(RebaseRef::Commit(cut)),
            ));
        }

        Ok((Strategy::Plain, None, Some(RebaseRef::Branch(target_name.clone()))))
    }

    /// `--dry-run` preview for `rebase_prefix`: classify each tip and report
    /// the strategy that would be applied, without checking out or mutating
    /// anything. Grounded on the teacher's own dry-run branch in
    /// `commands/restack.rs`, which prints the planned parent for every
    /// branch and exits before creating backups or running any rebase.
    fn preview_rebase_prefix(
        &self,
        tips: &[BranchName],
        prefix: &str,
        target: &Oid,
        target_name: &BranchName,
        all_branches: &[BranchName],
        initial_snapshot: &RefSnapshot,
    ) -> Result<(), EngineError> {
        crate::ui::output::info(&format!("[preview] {} stack(s) found under '{prefix}'", tips.len()));
        for tip in tips {
            let tip_commit = self.graph.resolve(tip.as_str())?;
            if self.oracle.is_obsolete(&tip_commit, target)? {
                crate::ui::output::bullet(&format!("{tip}: skip (already merged into {target_name})"));
                continue;
            }
            let (strategy, onto, upstream) =
                self.plan_strategy(tip, &tip_commit, target, target_name, all_branches, initial_snapshot)?;
            let description = match strategy {
                Strategy::SyncPoint => format!(
                    "rebase onto {} (sync-point, upstream {})",
                    onto.as_ref().map(RebaseRef::describe).unwrap_or_default(),
                    upstream.as_ref().map(RebaseRef::describe).unwrap_or_default()
                ),
                Strategy::CutPoint => format!(
                    "rebase (cut-point at {}) onto {target_name}",
                    upstream.as_ref().map(RebaseRef::describe).unwrap_or_default()
                ),
                Strategy::Plain => format!("rebase onto {target_name} (plain)"),
            };
            crate::ui::output::bullet(&format!("{tip}: {description}"));
        }
        crate::ui::output::info("no changes made (dry-run)");
        Ok(())
    }

    fn run_rebase(
        &self,
        tip: &BranchName,
        onto: Option<&RebaseRef>,
        upstream: Option<&RebaseRef>,
    ) -> Result<TipOutcome, EngineError> {
        match self.graph.rebase_update_refs(tip, onto, upstream)? {
            RebaseOutcome::Success => Ok(TipOutcome::Updated),
            RebaseOutcome::Conflicts => {
                self.graph.rebase_abort()?;
                let audit = EngineError::RebaseConflict {
                    branch: tip.as_str().to_string(),
                };
                crate::ui::output::error_stderr(&audit.to_string());
                Ok(TipOutcome::Failed)
            }
        }
    }

    /// `evolve([old_hash])`: rescue branches left orphaned by an in-place
    /// amend of the current branch.
    pub fn evolve(&self, old_hash: Option<&str>) -> Result<ResultLog, EngineError> {
        self.graph.gateway().require_minimum_version()?;

        let start_branch = self.graph.current_branch()?;
        let current = match &start_branch {
            crate::vcs::gateway::CurrentBranch::On(b) => b.clone(),
            crate::vcs::gateway::CurrentBranch::Detached => {
                return Err(EngineError::PreconditionFailed("HEAD is detached".to_string()))
            }
        };

        let old = match old_hash {
            Some(h) => self.graph.resolve(h)?,
            None => self.graph.resolve("HEAD@{1}")?,
        };
        let new = self.graph.resolve("HEAD")?;

        let containing_old = self.graph.branches_containing(&old)?;
        let mut candidates = Vec::new();
        for b in containing_old {
            if b == current {
                continue;
            }
            let b_commit = self.graph.resolve(b.as_str())?;
            if self.graph.is_ancestor(&new, &b_commit)? {
                continue;
            }
            candidates.push(b);
        }

        if candidates.is_empty() {
            return Err(EngineError::DiscoveryEmpty);
        }

        let initial_snapshot = RefSnapshot::capture(self.graph, &candidates)?;
        let tips = self.topology.find_tips(&candidates)?;

        if ExecutionContext::is_dry_run() {
            crate::ui::output::info(&format!(
                "[preview] {} orphaned tip(s) would be rebased onto the amended {current}:",
                tips.len()
            ));
            for tip in &tips {
                crate::ui::output::bullet(tip.as_str());
            }
            crate::ui::output::info("no changes made (dry-run)");
            return Ok(ResultLog::default());
        }

        let prompt = format!(
            "Rebase {} orphaned tip(s) onto the amended {}: {}?",
            tips.len(),
            current,
            tips.iter().map(BranchName::as_str).collect::<Vec<_>>().join(", ")
        );
        if !crate::ui::prompt::confirm(&prompt).unwrap_or(false) {
            return Err(EngineError::UserCancelled);
        }

        let mut log = ResultLog::default();
        for tip in &tips {
            let tip_commit = self.graph.resolve(tip.as_str())?;
            let members = self.graph.branches_merged_into(tip, None)?;
            let members = self.order_by_distance(&tip_commit, members)?;

            let sync = self.sync_finder.find_sync_point(tip, &candidates, &initial_snapshot)?;
            let outcome = if let Some(sync) = sync {
                self.run_rebase(
                    tip,
                    Some(&RebaseRef::Commit(sync.new_hash)),
                    Some(&RebaseRef::Commit(sync.old_hash)),
                )?
            } else if let Some(cut) = self.topology.find_cut_point(&tip_commit, &new, &self.oracle, self.obsolescence_window)? {
                self.run_rebase(tip, Some(&RebaseRef::Commit(new.clone())), Some(&RebaseRef::Commit(cut)))?
            } else {
                self.run_rebase(tip, Some(&RebaseRef::Commit(new.clone())), Some(&RebaseRef::Commit(old.clone())))?
            };

            match outcome {
                TipOutcome::Updated => log.updated.push(LoggedStack {
                    tip: tip.clone(),
                    members,
                }),
                TipOutcome::Failed => log.failed.push(LoggedStack {
                    tip: tip.clone(),
                    members,
                }),
                TipOutcome::Skipped => unreachable!(),
            }
        }

        self.restore_start_branch(&start_branch)?;
        Ok(log)
    }

    fn restore_start_branch(&self, start_branch: &crate::vcs::gateway::CurrentBranch) -> Result<(), EngineError> {
        match start_branch {
            crate::vcs::gateway::CurrentBranch::On(b) => {
                if self.graph.checkout(b).is_err() {
                    // The starting branch may itself have been deleted by the
                    // cleanup prompt above; warn rather than failing the batch.
                    eprintln!("warning: could not restore starting branch {b}; it may have been deleted");
                }
            }
            crate::vcs::gateway::CurrentBranch::Detached => {}
        }
        Ok(())
    }
}
