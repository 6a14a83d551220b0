use clap::error::ErrorKind;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod context;
mod engine;
pub mod program_name;
pub mod ui;
mod vcs;

use cli::{Cli, Commands};

fn main() {
    let prog_name = program_name::program_name();
    let cli = match Cli::try_parse_from({
        let mut args: Vec<String> = std::env::args().collect();
        args[0] = prog_name.to_string();
        args
    }) {
        Ok(cli) => cli,
        Err(e) => {
            // clap exits with status 2 on usage errors by default; a missing
            // required argument must exit 1, so print and exit ourselves.
            // --help/--version still print to stdout and exit 0.
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    print!("{e}");
                    std::process::exit(0);
                }
                _ => {
                    eprint!("{e}");
                    std::process::exit(1);
                }
            }
        }
    };

    context::ExecutionContext::init(cli.verbose, cli.dry_run);

    let result = match cli.command {
        Commands::RebasePrefix { prefix, target } => commands::rebase_prefix::run(prefix, target),
        Commands::Evolve { old_hash } => commands::evolve::run(old_hash),
        Commands::PushPrefix { prefix, push_opts } => commands::push_prefix::run(prefix, push_opts),
        Commands::PruneLocal => commands::prune_local::run(context::ExecutionContext::is_dry_run()),
        Commands::PruneRemotePrefix { prefix, target } => {
            commands::prune_remote_prefix::run(prefix, target, context::ExecutionContext::is_dry_run())
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
