//! Command-line surface: one entry point per batch command.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    about = "sr: a stack rebase engine for maintaining stacked branches",
    long_about = None,
    version,
    disable_help_subcommand = true,
    help_template = "\
{about}

{usage-heading} {usage}

Commands:
  rebase-prefix        Rebase every branch under a prefix onto a target
  evolve               Rescue branches orphaned by amending the current one
  push-prefix          Push every branch under a prefix
  prune-local          Delete local branches whose upstream is gone
  prune-remote-prefix  Delete remote branches under a prefix already landed

Options:
  -v, --verbose  Show git commands being executed
  -n, --dry-run  Preview without executing
  -h, --help     Print help
  -V, --version  Print version

Run '{bin} <command> --help' for more information on a command.
"
)]
pub struct Cli {
    /// Echo every git command the engine runs
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Preview the batch plan without executing any rebase or mutation
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebase every branch under `prefix` onto `target`, preserving stack topology
    #[command(
        name = "rebase-prefix",
        after_help = "\
Examples:
  rebase-prefix f/              Rebase every f/* branch onto main
  rebase-prefix f/ develop      Rebase onto develop instead"
    )]
    RebasePrefix {
        /// Branch-name prefix to scan, e.g. `f/`
        prefix: String,
        /// Target branch (defaults to the configured target, usually `main`)
        target: Option<String>,
    },

    /// Rescue branches left orphaned by an in-place amend of the current branch
    #[command(
        after_help = "\
Examples:
  evolve              Use the reflog's previous HEAD position as the old hash
  evolve a1b2c3d      Use an explicit old hash"
    )]
    Evolve {
        /// Previous commit hash to rescue descendants from (defaults to the
        /// reflog's previous HEAD position)
        old_hash: Option<String>,
    },

    /// Push every branch under `prefix` to the configured remote
    #[command(name = "push-prefix")]
    PushPrefix {
        /// Branch-name prefix to scan, e.g. `f/`
        prefix: String,
        /// Additional options forwarded to `git push`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        push_opts: Vec<String>,
    },

    /// Delete local branches whose upstream tracking ref is gone
    ///
    /// Use the top-level `-n`/`--dry-run` flag to list candidates without
    /// deleting them.
    #[command(name = "prune-local")]
    PruneLocal,

    /// Delete remote branches under `prefix` already landed in `target`
    ///
    /// Use the top-level `-n`/`--dry-run` flag to list candidates without
    /// deleting them.
    #[command(name = "prune-remote-prefix")]
    PruneRemotePrefix {
        /// Branch-name prefix to scan on the remote, e.g. `f/`
        prefix: String,
        /// Target branch to check obsolescence against (defaults to the
        /// configured target, usually `main`)
        target: Option<String>,
    },
}
