//! Canonical identifier types shared across the engine.

use crate::engine::error::EngineError;
use std::fmt;

/// A commit object id. Validated to look like a SHA-1 (40 hex chars) or
/// SHA-256 (64 hex chars) digest; equality is by string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid(String);

impl Oid {
    /// Parse a hex string into an `Oid`, validating its shape.
    pub fn parse(s: &str) -> Result<Self, EngineError> {
        let s = s.trim();
        if !matches!(s.len(), 40 | 64) || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(EngineError::VcsError {
                exit_code: None,
                stderr: format!("not a valid object id: {s:?}"),
            });
        }
        Ok(Self(s.to_lowercase()))
    }

    /// Build an `Oid` from output already known to be well-formed (git's own
    /// stdout). Skips validation; never construct this from untrusted input.
    pub fn from_trusted(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 7 characters, for display.
    pub fn short(&self) -> &str {
        &self.0[..7.min(self.0.len())]
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directory snapshot id. Distinct type from `Oid` so a tree can never be
/// passed where a commit is expected, even though both are hex digests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeId(String);

impl TreeId {
    pub fn from_trusted(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A qualified local branch reference name, e.g. `feature/login-ui`.
///
/// Additionally records whether the name falls under the batch's `prefix`
/// argument, purely as a display convenience — this never affects equality
/// or hashing (still by the bare name) and is never persisted.
#[derive(Debug, Clone, Eq)]
pub struct BranchName {
    name: String,
    in_prefix: bool,
}

impl BranchName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            in_prefix: false,
        }
    }

    pub fn with_prefix_flag(name: impl Into<String>, in_prefix: bool) -> Self {
        Self {
            name: name.into(),
            in_prefix,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Whether this branch was discovered under the batch's scanned prefix.
    pub fn is_prefix_scoped(&self) -> bool {
        self.in_prefix
    }

    /// Fully qualified local ref, `refs/heads/<name>`.
    pub fn local_ref(&self) -> String {
        format!("refs/heads/{}", self.name)
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq for BranchName {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::hash::Hash for BranchName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for BranchName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BranchName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}
