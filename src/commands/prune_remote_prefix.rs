//! `prune-remote-prefix <prefix> [target] [--dry-run]` — delete remote
//! branches under `prefix` whose content has already landed in `target`.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::engine::obsolescence::ObsolescenceOracle;
use crate::ui;
use crate::vcs::gateway::{RefScope, VcsGateway};
use crate::vcs::graph::GraphQueries;

pub fn run(prefix: String, target: Option<String>, dry_run: bool) -> Result<i32> {
    let config = Config::load()?;
    let target = target.unwrap_or(config.target);

    let gateway = VcsGateway::from_cwd().context("failed to open repository")?;
    let graph = GraphQueries::new(gateway);

    let target_ref = format!("{}/{target}", config.remote);
    let target_oid = graph
        .resolve(&target_ref)
        .with_context(|| format!("unknown target branch '{target_ref}'"))?;

    let remote_branches = graph.list_refs(
        &prefix,
        &RefScope::Remote {
            remote: config.remote.clone(),
        },
    )?;
    if remote_branches.is_empty() {
        ui::output::info(&format!("no remote branches found under prefix '{prefix}'"));
        return Ok(0);
    }

    let oracle = ObsolescenceOracle::new(&graph, config.obsolescence_window);
    let mut landed = Vec::new();
    for branch in &remote_branches {
        // `branch.as_str()` is already the short remote ref (e.g. `origin/f/a`);
        // `list_refs` resolved it from `refs/remotes/<remote>/<prefix>*`.
        let commit = graph.resolve(branch.as_str())?;
        if oracle.is_obsolete(&commit, &target_oid)? {
            // Strip the remote prefix back off: `delete_remote`/`push --delete`
            // take the bare branch name alongside the remote argument.
            let bare = branch
                .as_str()
                .strip_prefix(&format!("{}/", config.remote))
                .unwrap_or(branch.as_str());
            landed.push(crate::vcs::types::BranchName::new(bare));
        }
    }

    if landed.is_empty() {
        ui::output::info("nothing landed yet");
        return Ok(0);
    }

    if dry_run {
        ui::output::info("would delete on remote:");
        for branch in &landed {
            ui::output::bullet(branch.as_str());
        }
        return Ok(0);
    }

    match graph.gateway().delete_remote(&config.remote, &landed) {
        Ok(()) => {
            for branch in &landed {
                ui::output::bullet_success(branch.as_str());
            }
            Ok(0)
        }
        Err(e) => {
            ui::output::error_stderr(&e.to_string());
            Ok(1)
        }
    }
}
