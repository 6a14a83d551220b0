//! `prune-local [--dry-run]` — delete local branches whose upstream tracking
//! ref is gone, e.g. after the remote branch was deleted on merge.

use anyhow::{Context, Result};

use crate::ui;
use crate::vcs::gateway::VcsGateway;
use crate::vcs::graph::GraphQueries;

pub fn run(dry_run: bool) -> Result<i32> {
    let gateway = VcsGateway::from_cwd().context("failed to open repository")?;
    let graph = GraphQueries::new(gateway);

    let gone = graph.gateway().branches_with_gone_upstream()?;
    if gone.is_empty() {
        ui::output::info("nothing to prune");
        return Ok(0);
    }

    if dry_run {
        ui::output::info("would delete:");
        for branch in &gone {
            ui::output::bullet(branch.as_str());
        }
        return Ok(0);
    }

    match graph.gateway().delete_local(&gone) {
        Ok(()) => {
            for branch in &gone {
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
