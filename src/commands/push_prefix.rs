//! `push_prefix <prefix> [push_opts...]` — a thin wrapper over the host
//! VCS's push, not part of the core rebase engine.

use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::config::Config;
use crate::context::ExecutionContext;
use crate::ui;
use crate::vcs::gateway::{RefScope, VcsGateway};
use crate::vcs::graph::GraphQueries;

pub fn run(prefix: String, push_opts: Vec<String>) -> Result<i32> {
    let config = Config::load()?;
    let gateway = VcsGateway::from_cwd().context("failed to open repository")?;
    let graph = GraphQueries::new(gateway);

    let local = graph.list_refs(&prefix, &RefScope::Local)?;
    if local.is_empty() {
        ui::output::info(&format!("no branches found under prefix '{prefix}'"));
        return Ok(0);
    }

    // Cache the remote state once, up front, rather than re-querying per
    // branch as the batch pushes — consistent with the engine's
    // snapshot-before-mutation discipline elsewhere.
    let remote_refs = graph.list_refs(
        &prefix,
        &RefScope::Remote {
            remote: config.remote.clone(),
        },
    )?;
    let mut cached_remote: HashMap<String, _> = HashMap::new();
    for branch in &remote_refs {
        if let Ok(oid) = graph.resolve(branch.as_str()) {
            cached_remote.insert(branch.as_str().to_string(), oid);
        }
    }

    let mut to_push = Vec::new();
    for branch in &local {
        let local_oid = graph.resolve(branch.as_str())?;
        let remote_key = format!("{}/{}", config.remote, branch.as_str());
        match cached_remote.get(&remote_key) {
            Some(remote_oid) if *remote_oid == local_oid => continue,
            _ => to_push.push(branch.clone()),
        }
    }

    if to_push.is_empty() {
        ui::output::info("everything already pushed");
        return Ok(0);
    }

    if ExecutionContext::is_dry_run() {
        ui::output::info(&format!("[preview] would push {} branch(es) to {}:", to_push.len(), config.remote));
        for branch in &to_push {
            ui::output::bullet(branch.as_str());
        }
        return Ok(0);
    }

    let opts: Vec<&str> = push_opts.iter().map(String::as_str).collect();
    match graph.gateway().push(&config.remote, &to_push, &opts) {
        Ok(()) => {
            for branch in &to_push {
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
