//! `evolve [old_hash]` — rescue branches orphaned by amending the current one.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::engine::error::EngineError;
use crate::engine::executor::Executor;
use crate::ui;
use crate::vcs::gateway::VcsGateway;
use crate::vcs::graph::GraphQueries;

pub fn run(old_hash: Option<String>) -> Result<i32> {
    let config = Config::load()?;

    let gateway = VcsGateway::from_cwd().context("failed to open repository")?;
    let graph = GraphQueries::new(gateway);
    let executor = Executor::new(&graph, config.obsolescence_window);

    match executor.evolve(old_hash.as_deref()) {
        Ok(log) => {
            ui::presenter::render_result_log(&log);
            Ok(log.exit_code())
        }
        Err(EngineError::DiscoveryEmpty) => {
            ui::output::info("nothing to evolve");
            Ok(0)
        }
        Err(EngineError::UserCancelled) => {
            ui::output::info("cancelled");
            Ok(0)
        }
        Err(e @ EngineError::PreconditionFailed(_)) => {
            ui::output::error_stderr(&e.to_string());
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
