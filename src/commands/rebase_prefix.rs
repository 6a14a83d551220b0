//! `rebase_prefix <prefix> [target]` — the main batch rebase loop.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::engine::executor::Executor;
use crate::engine::error::EngineError;
use crate::ui;
use crate::vcs::gateway::VcsGateway;
use crate::vcs::graph::GraphQueries;
use crate::vcs::types::BranchName;

pub fn run(prefix: String, target: Option<String>) -> Result<i32> {
    let config = Config::load()?;
    let target = target.unwrap_or(config.target);

    let gateway = VcsGateway::from_cwd().context("failed to open repository")?;
    let graph = GraphQueries::new(gateway);
    let executor = Executor::new(&graph, config.obsolescence_window);

    match executor.rebase_prefix(&prefix, &BranchName::new(target)) {
        Ok(log) => {
            ui::presenter::render_result_log(&log);
            Ok(log.exit_code())
        }
        Err(EngineError::DiscoveryEmpty) => {
            ui::output::info(&format!("no branches found under prefix '{prefix}'"));
            Ok(0)
        }
        Err(e @ EngineError::PreconditionFailed(_)) => {
            ui::output::error_stderr(&e.to_string());
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
