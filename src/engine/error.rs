//! Typed error taxonomy for the engine boundary.
//!
//! The CLI/command layer uses `anyhow::Result` and converts these with `?` and
//! `.context(...)`; within the engine itself, errors are this closed, named
//! set so callers can match on *kind* rather than parse message strings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// VCS missing, wrong version, unknown target branch, missing argument.
    /// Fatal; reported before any mutation is attempted.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// No matching branches found for the requested scope. Non-fatal.
    #[error("no matching branches found")]
    DiscoveryEmpty,

    /// A stack's rebase hit a conflict; that stack was aborted and reverted.
    #[error("rebase conflict on {branch}")]
    RebaseConflict { branch: String },

    /// `checkout`, `pull`, or `push` failed in an auxiliary command.
    #[error("auxiliary operation failed: {0}")]
    AuxiliaryFailure(String),

    /// An interactive prompt was declined (or defaulted to N on closed stdin).
    #[error("cancelled by user")]
    UserCancelled,

    /// The underlying VCS executable could not be invoked at all.
    #[error("vcs unavailable: {0}")]
    VcsUnavailable(String),

    /// The VCS ran but returned a non-zero exit code for a structural query.
    #[error("vcs command failed{}: {stderr}", exit_code.map(|c| format!(" (exit {c})")).unwrap_or_default())]
    VcsError { exit_code: Option<i32>, stderr: String },

    /// A ref name could not be resolved to a commit.
    #[error("unknown ref: {0}")]
    UnknownRef(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebase_conflict_message() {
        let err = EngineError::RebaseConflict {
            branch: "f/a".to_string(),
        };
        assert_eq!(err.to_string(), "rebase conflict on f/a");
    }

    #[test]
    fn test_vcs_error_message_without_exit_code() {
        let err = EngineError::VcsError {
            exit_code: None,
            stderr: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "vcs command failed: boom");
    }

    #[test]
    fn test_vcs_error_message_with_exit_code() {
        let err = EngineError::VcsError {
            exit_code: Some(128),
            stderr: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "vcs command failed (exit 128): boom");
    }
}
