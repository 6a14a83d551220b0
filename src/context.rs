//! Execution context for the CLI.
//!
//! Provides process-wide storage for global flags (`--verbose`, `--dry-run`)
//! so that deeply nested engine code can check them without threading the
//! flags through every function signature. The engine is single-threaded, so
//! a thread-local is sufficient — there is no async runtime here to
//! propagate context across `.await` points.

use std::cell::RefCell;

thread_local! {
    static CONTEXT: RefCell<ExecutionContext> = RefCell::new(ExecutionContext::default());
}

/// Global execution context for the current CLI invocation.
#[derive(Clone, Copy, Default)]
pub struct ExecutionContext {
    /// Echo every `git` subcommand invoked by the gateway.
    pub verbose: bool,
    /// Preview the batch plan without executing any rebase or mutation.
    pub dry_run: bool,
}

impl ExecutionContext {
    /// Initialize the context for this process.
    pub fn init(verbose: bool, dry_run: bool) {
        CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = ExecutionContext { verbose, dry_run };
        });
    }

    /// Whether `--verbose` was passed.
    pub fn is_verbose() -> bool {
        CONTEXT.with(|ctx| ctx.borrow().verbose)
    }

    /// Whether `--dry-run` was passed.
    pub fn is_dry_run() -> bool {
        CONTEXT.with(|ctx| ctx.borrow().dry_run)
    }
}
