//! Ancestry and tree derivations over `VcsGateway`, cached within one invocation.
//!
//! Centralizing git operations behind one type buys consistent error
//! handling and easy testing with isolated repositories.

use crate::engine::error::EngineError;
use crate::vcs::gateway::{CherryEntry, CurrentBranch, MergeTreeResult, RebaseOutcome, RebaseRef, RefScope, VcsGateway};
use crate::vcs::types::{BranchName, Oid, TreeId};
use std::cell::RefCell;
use std::collections::HashMap;

/// Read-mostly derivations over a `VcsGateway`, with an in-invocation cache
/// for the two queries that dominate the engine's ancestry probes.
pub struct GraphQueries {
    gateway: VcsGateway,
    ancestor_cache: RefCell<HashMap<(Oid, Oid), bool>>,
    tree_cache: RefCell<HashMap<Oid, TreeId>>,
}

impl GraphQueries {
    pub fn new(gateway: VcsGateway) -> Self {
        Self {
            gateway,
            ancestor_cache: RefCell::new(HashMap::new()),
            tree_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn gateway(&self) -> &VcsGateway {
        &self.gateway
    }

    pub fn current_branch(&self) -> Result<CurrentBranch, EngineError> {
        self.gateway.current_branch()
    }

    pub fn resolve(&self, reference: &str) -> Result<Oid, EngineError> {
        self.gateway.resolve(reference)
    }

    pub fn tree_of(&self, commit: &Oid) -> Result<TreeId, EngineError> {
        if let Some(tree) = self.tree_cache.borrow().get(commit) {
            return Ok(tree.clone());
        }
        let tree = self.gateway.tree_of(commit)?;
        self.tree_cache.borrow_mut().insert(commit.clone(), tree.clone());
        Ok(tree)
    }

    pub fn is_ancestor(&self, a: &Oid, b: &Oid) -> Result<bool, EngineError> {
        let key = (a.clone(), b.clone());
        if let Some(result) = self.ancestor_cache.borrow().get(&key) {
            return Ok(*result);
        }
        let result = self.gateway.is_ancestor(a, b)?;
        self.ancestor_cache.borrow_mut().insert(key, result);
        Ok(result)
    }

    pub fn rev_list(&self, excluded: &Oid, included: &Oid, max: usize) -> Result<Vec<Oid>, EngineError> {
        self.gateway.rev_list(excluded, included, max)
    }

    pub fn rev_list_count(&self, excluded: &Oid, included: &Oid) -> Result<usize, EngineError> {
        self.gateway.rev_list_count(excluded, included)
    }

    pub fn list_refs(&self, prefix: &str, scope: &RefScope) -> Result<Vec<BranchName>, EngineError> {
        self.gateway.list_refs(prefix, scope)
    }

    pub fn branches_merged_into(&self, tip: &BranchName, prefix: Option<&str>) -> Result<Vec<BranchName>, EngineError> {
        self.gateway.branches_merged_into(tip, prefix)
    }

    pub fn branches_containing(&self, commit: &Oid) -> Result<Vec<BranchName>, EngineError> {
        self.gateway.branches_containing(commit)
    }

    pub fn upstream_of(&self, branch: &BranchName) -> Result<Option<BranchName>, EngineError> {
        self.gateway.upstream_of(branch)
    }

    pub fn cherry(&self, upstream: &Oid, head: &Oid) -> Result<Vec<CherryEntry>, EngineError> {
        self.gateway.cherry(upstream, head)
    }

    pub fn merge_tree(&self, base: &Oid, head: &Oid) -> Result<MergeTreeResult, EngineError> {
        self.gateway.merge_tree(base, head)
    }

    pub fn rebase_update_refs(
        &self,
        branch: &BranchName,
        onto: Option<&RebaseRef>,
        upstream: Option<&RebaseRef>,
    ) -> Result<RebaseOutcome, EngineError> {
        self.gateway.rebase_update_refs(branch, onto, upstream)
    }

    pub fn rebase_abort(&self) -> Result<(), EngineError> {
        self.gateway.rebase_abort()
    }

    pub fn checkout(&self, branch: &BranchName) -> Result<(), EngineError> {
        self.gateway.checkout(branch)
    }
}
