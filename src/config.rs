//! Layered configuration.
//!
//! Settings are merged from, in ascending priority:
//! 1. Repo shared: `.sr/config.toml` (committed, team-wide)
//! 2. User global: `~/.config/sr/config.toml` (personal defaults)
//! 3. Process defaults baked into this module
//!
//! Configuration uses TOML format for readability.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn default_remote() -> String {
    "origin".to_string()
}

fn default_target() -> String {
    "main".to_string()
}

/// Default obsolescence lookback window, in commits. Tunable rather than a
/// fixed constant since repos differ wildly in commit cadence.
fn default_obsolescence_window() -> usize {
    100
}

/// Repository-level configuration (stored in `.sr/config.toml`, committed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Default target branch for `rebase-prefix` / `prune-remote-prefix` when
    /// the caller does not pass `--target`.
    #[serde(default = "default_target")]
    pub target: String,

    /// Git remote name used for `push-prefix` / `prune-remote-prefix`.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Number of commits to walk back when looking for a historical tree
    /// match when neither patch-id nor merge-tree comparison settles it.
    #[serde(default = "default_obsolescence_window")]
    pub obsolescence_window: usize,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            remote: default_remote(),
            obsolescence_window: default_obsolescence_window(),
        }
    }
}

/// User-level configuration (stored in `~/.config/sr/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    pub target: Option<String>,
    pub remote: Option<String>,
    pub obsolescence_window: Option<usize>,
}

/// Merged configuration used by every command.
#[derive(Debug, Clone)]
pub struct Config {
    pub target: String,
    pub remote: String,
    pub obsolescence_window: usize,
}

impl Config {
    /// Load configuration from all layers, merging with priority:
    /// user > repo > defaults.
    pub fn load() -> Result<Self> {
        let repo_config = Self::load_repo_config();
        let user_config = Self::load_user_config();

        let target = user_config.target.unwrap_or(repo_config.target);
        let remote = user_config.remote.unwrap_or(repo_config.remote);
        let obsolescence_window = user_config
            .obsolescence_window
            .unwrap_or(repo_config.obsolescence_window);

        Ok(Config {
            target,
            remote,
            obsolescence_window,
        })
    }

    /// Load repo config from `.sr/config.toml` (committed, shared).
    fn load_repo_config() -> RepoConfig {
        let path = match Self::repo_config_path() {
            Ok(p) => p,
            Err(_) => return RepoConfig::default(),
        };

        Self::load_toml_file(&path).unwrap_or_default()
    }

    /// Load user config from `~/.config/sr/config.toml`.
    fn load_user_config() -> UserConfig {
        let path = match Self::user_config_path() {
            Ok(p) => p,
            Err(_) => return UserConfig::default(),
        };

        Self::load_toml_file(&path).unwrap_or_default()
    }

    /// Load and parse a TOML config file, falling back to defaults if the
    /// file is missing or malformed rather than failing the whole command.
    fn load_toml_file<T: for<'de> Deserialize<'de> + Default>(path: &PathBuf) -> Result<T> {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(path).context("failed to read config file")?;

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!("warning: config file {:?} is invalid ({}), using defaults", path, e);
                Ok(T::default())
            }
        }
    }

    /// Path to user config: `~/.config/sr/config.toml`.
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine user config directory")?;
        Ok(config_dir.join("sr").join("config.toml"))
    }

    /// Path to repo config: `.sr/config.toml`, relative to the working tree root.
    pub fn repo_config_path() -> Result<PathBuf> {
        let git_root = find_git_root()?;
        Ok(git_root.join(".sr").join("config.toml"))
    }
}

/// Locate the working tree root via `git rev-parse --show-toplevel`.
///
/// Shells out rather than reading `.git` directly, consistent with every
/// other repository access in this crate.
pub fn find_git_root() -> Result<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .context("failed to invoke git")?;

    if !output.status.success() {
        anyhow::bail!("not inside a git repository");
    }

    let path = String::from_utf8(output.stdout)
        .context("git produced non-UTF-8 output")?
        .trim()
        .to_string();

    Ok(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_config_defaults() {
        let config = RepoConfig::default();
        assert_eq!(config.target, "main");
        assert_eq!(config.remote, "origin");
        assert_eq!(config.obsolescence_window, 100);
    }

    #[test]
    fn test_parse_partial_repo_toml() {
        let toml_content = r#"
target = "develop"
"#;
        let config: RepoConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.target, "develop");
        assert_eq!(config.remote, "origin");
        assert_eq!(config.obsolescence_window, 100);
    }

    #[test]
    fn test_parse_empty_repo_toml() {
        let config: RepoConfig = toml::from_str("").unwrap();
        assert_eq!(config, RepoConfig::default());
    }

    #[test]
    fn test_parse_user_toml_overrides_are_optional() {
        let toml_content = r#"
remote = "upstream"
"#;
        let config: UserConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.remote, Some("upstream".to_string()));
        assert_eq!(config.target, None);
        assert_eq!(config.obsolescence_window, None);
    }

    #[test]
    fn test_corrupt_toml_falls_back_to_default() {
        let result: Result<RepoConfig, _> = toml::from_str("{ this is not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_obsolescence_window_override() {
        let toml_content = r#"
obsolescence_window = 250
"#;
        let config: RepoConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.obsolescence_window, 250);
    }
}
