//! Thin wrapper around the `git` executable.
//!
//! Every other component in the engine reaches the repository through this
//! gateway; nothing else spawns a `git` process directly. Grounded on the
//! teacher's `SubprocessBackend` (`git_backend/subprocess_backend.rs`) and its
//! `run_git`/`run_git_success`/`run_git_stdout` helper trio, generalized to
//! return `EngineError` instead of `anyhow::Error` at this layer.

use crate::context::ExecutionContext;
use crate::engine::error::EngineError;
use crate::vcs::types::{BranchName, Oid, TreeId};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Outcome of `rebase_update_refs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseOutcome {
    Success,
    Conflicts,
}

/// Current branch, or detached HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentBranch {
    On(BranchName),
    Detached,
}

/// One entry of `git cherry` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CherryMarker {
    /// `+`: no patch-id-equivalent commit found upstream.
    Plus,
    /// `-`: an equivalent commit already exists upstream.
    Minus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CherryEntry {
    pub marker: CherryMarker,
    pub commit: Oid,
}

/// Result of a tree-level merge simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeTreeResult {
    Tree(TreeId),
    Conflict,
}

/// Where to look for refs in `list_refs`.
#[derive(Debug, Clone)]
pub enum RefScope {
    Local,
    Remote { remote: String },
}

/// Either endpoint accepted by `rebase_update_refs`: a raw commit or a
/// branch name that gets resolved by `git` itself.
#[derive(Debug, Clone)]
pub enum RebaseRef {
    Commit(Oid),
    Branch(BranchName),
}

impl RebaseRef {
    fn as_arg(&self) -> String {
        match self {
            RebaseRef::Commit(oid) => oid.to_string(),
            RebaseRef::Branch(name) => name.as_str().to_string(),
        }
    }

    /// Short human-readable form for dry-run previews: a branch name as-is,
    /// a commit abbreviated to its first 8 hex characters.
    pub fn describe(&self) -> String {
        match self {
            RebaseRef::Commit(oid) => oid.as_str().chars().take(8).collect(),
            RebaseRef::Branch(name) => name.as_str().to_string(),
        }
    }
}

fn verbose_cmd(args: &[&str]) {
    if ExecutionContext::is_verbose() {
        eprintln!("  {} git {}", "[cmd]".dimmed(), args.join(" "));
    }
}

pub struct VcsGateway {
    workdir: PathBuf,
}

impl VcsGateway {
    /// Open the repository containing `path` (or the current directory).
    pub fn discover(path: &Path) -> Result<Self, EngineError> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .output()
            .map_err(|e| EngineError::VcsUnavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(EngineError::PreconditionFailed(
                "not inside a git working tree".to_string(),
            ));
        }

        let workdir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        Ok(Self { workdir })
    }

    pub fn from_cwd() -> Result<Self, EngineError> {
        let cwd = std::env::current_dir().map_err(|e| EngineError::VcsUnavailable(e.to_string()))?;
        Self::discover(&cwd)
    }

    fn run(&self, args: &[&str]) -> Result<Output, EngineError> {
        verbose_cmd(args);
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| EngineError::VcsUnavailable(e.to_string()))
    }

    fn run_ok(&self, args: &[&str]) -> Result<(), EngineError> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(EngineError::VcsError {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn run_stdout(&self, args: &[&str]) -> Result<String, EngineError> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(EngineError::VcsError {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// `git --version`, parsed into `(major, minor, patch)`.
    pub fn version(&self) -> Result<(u32, u32, u32), EngineError> {
        let stdout = self.run_stdout(&["--version"])?;
        let version_str = stdout
            .split_whitespace()
            .nth(2)
            .ok_or_else(|| EngineError::VcsError {
                exit_code: None,
                stderr: format!("unrecognized `git --version` output: {stdout}"),
            })?;

        let mut parts = version_str.split('.');
        let major = parts.next().unwrap_or("0").parse().unwrap_or(0);
        let minor = parts.next().unwrap_or("0").parse().unwrap_or(0);
        let patch = parts
            .next()
            .unwrap_or("0")
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .unwrap_or(0);
        Ok((major, minor, patch))
    }

    /// Fail if `version()` is below the minimum the engine requires
    /// (the `--update-refs` rebase primitive, added in git 2.38).
    pub fn require_minimum_version(&self) -> Result<(), EngineError> {
        let (major, minor, _) = self.version()?;
        if (major, minor) < (2, 38) {
            return Err(EngineError::PreconditionFailed(format!(
                "git {major}.{minor} is too old; this tool requires git >= 2.38 for `rebase --update-refs`"
            )));
        }
        Ok(())
    }

    pub fn current_branch(&self) -> Result<CurrentBranch, EngineError> {
        let name = self.run_stdout(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        if name == "HEAD" {
            Ok(CurrentBranch::Detached)
        } else {
            Ok(CurrentBranch::On(BranchName::new(name)))
        }
    }

    /// Resolve any ref expression to a commit id.
    pub fn resolve(&self, reference: &str) -> Result<Oid, EngineError> {
        let expr = format!("{reference}^{{commit}}");
        let output = self.run(&["rev-parse", "--verify", "--quiet", &expr])?;
        if !output.status.success() {
            return Err(EngineError::UnknownRef(reference.to_string()));
        }
        Ok(Oid::from_trusted(String::from_utf8_lossy(&output.stdout).trim()))
    }

    pub fn tree_of(&self, commit: &Oid) -> Result<TreeId, EngineError> {
        let expr = format!("{commit}^{{tree}}");
        let stdout = self.run_stdout(&["rev-parse", &expr])?;
        Ok(TreeId::from_trusted(stdout))
    }

    pub fn is_ancestor(&self, a: &Oid, b: &Oid) -> Result<bool, EngineError> {
        let output = self.run(&["merge-base", "--is-ancestor", a.as_str(), b.as_str()])?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(EngineError::VcsError {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    /// Commits reachable from `included` but not `excluded`, newest first.
    pub fn rev_list(&self, excluded: &Oid, included: &Oid, max: usize) -> Result<Vec<Oid>, EngineError> {
        let max_arg = format!("--max-count={max}");
        let exclude_arg = format!("^{excluded}");
        let stdout = self.run_stdout(&["rev-list", &max_arg, included.as_str(), &exclude_arg])?;
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(Oid::from_trusted)
            .collect())
    }

    pub fn rev_list_count(&self, excluded: &Oid, included: &Oid) -> Result<usize, EngineError> {
        let exclude_arg = format!("^{excluded}");
        let stdout = self.run_stdout(&["rev-list", "--count", included.as_str(), &exclude_arg])?;
        stdout.trim().parse().map_err(|_| EngineError::VcsError {
            exit_code: None,
            stderr: format!("unexpected `git rev-list --count` output: {stdout}"),
        })
    }

    /// Branches whose name starts with `prefix`.
    pub fn list_refs(&self, prefix: &str, scope: &RefScope) -> Result<Vec<BranchName>, EngineError> {
        let pattern = match scope {
            RefScope::Local => format!("refs/heads/{prefix}*"),
            RefScope::Remote { remote } => format!("refs/remotes/{remote}/{prefix}*"),
        };
        let stdout = self.run_stdout(&["for-each-ref", "--format=%(refname:short)", &pattern])?;
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| BranchName::with_prefix_flag(l, true))
            .collect())
    }

    /// Local branches, optionally narrowed to `prefix`, whose tip is an
    /// ancestor of `tip` (i.e. already merged into it).
    pub fn branches_merged_into(&self, tip: &BranchName, prefix: Option<&str>) -> Result<Vec<BranchName>, EngineError> {
        let pattern = match prefix {
            Some(p) => format!("refs/heads/{p}*"),
            None => "refs/heads/*".to_string(),
        };
        let merged_arg = format!("--merged={}", tip.as_str());
        let stdout = self.run_stdout(&["for-each-ref", "--format=%(refname:short)", &merged_arg, &pattern])?;
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(BranchName::new)
            .collect())
    }

    /// Local branches whose history contains `commit`.
    pub fn branches_containing(&self, commit: &Oid) -> Result<Vec<BranchName>, EngineError> {
        let contains_arg = format!("--contains={commit}");
        let stdout = self.run_stdout(&["branch", "--format=%(refname:short)", &contains_arg])?;
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(BranchName::new)
            .collect())
    }

    pub fn upstream_of(&self, branch: &BranchName) -> Result<Option<BranchName>, EngineError> {
        let expr = format!("{}@{{upstream}}", branch.as_str());
        let output = self.run(&["rev-parse", "--abbrev-ref", &expr])?;
        if !output.status.success() {
            return Ok(None);
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(BranchName::new(name)))
    }

    /// Patch-id comparison of every commit reachable from `head` but not
    /// `upstream`, against `upstream`'s history.
    pub fn cherry(&self, upstream: &Oid, head: &Oid) -> Result<Vec<CherryEntry>, EngineError> {
        let stdout = self.run_stdout(&["cherry", upstream.as_str(), head.as_str()])?;
        stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(|line| {
                let mut parts = line.splitn(2, ' ');
                let marker = match parts.next() {
                    Some("+") => CherryMarker::Plus,
                    Some("-") => CherryMarker::Minus,
                    other => {
                        return Err(EngineError::VcsError {
                            exit_code: None,
                            stderr: format!("unexpected `git cherry` marker: {other:?}"),
                        })
                    }
                };
                let commit = parts.next().ok_or_else(|| EngineError::VcsError {
                    exit_code: None,
                    stderr: format!("malformed `git cherry` line: {line}"),
                })?;
                Ok(CherryEntry {
                    marker,
                    commit: Oid::from_trusted(commit),
                })
            })
            .collect()
    }

    /// Tree that would result from merging `head` into `base`, or a
    /// conflict. Uses `git merge-tree --write-tree`, available unconditionally
    /// since the engine already requires git >= 2.38.
    pub fn merge_tree(&self, base: &Oid, head: &Oid) -> Result<MergeTreeResult, EngineError> {
        let output = self.run(&["merge-tree", "--write-tree", base.as_str(), head.as_str()])?;
        if output.status.success() {
            let tree = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .to_string();
            Ok(MergeTreeResult::Tree(TreeId::from_trusted(tree)))
        } else {
            Ok(MergeTreeResult::Conflict)
        }
    }

    /// Rebase `branch` with `--update-refs`, so every branch ref pointing
    /// into the replayed range moves along with it.
    ///
    /// - `upstream` only: plain rebase of `branch` onto `upstream`.
    /// - `onto` and `upstream`: `git rebase --update-refs --onto <onto> <upstream> <branch>`,
    ///   replaying only the range `(upstream, branch]` onto `onto`.
    pub fn rebase_update_refs(
        &self,
        branch: &BranchName,
        onto: Option<&RebaseRef>,
        upstream: Option<&RebaseRef>,
    ) -> Result<RebaseOutcome, EngineError> {
        self.checkout(branch)?;

        let mut args: Vec<String> = vec!["rebase".to_string(), "--update-refs".to_string()];
        if let Some(onto) = onto {
            args.push("--onto".to_string());
            args.push(onto.as_arg());
        }
        let upstream_arg = upstream.map(|u| u.as_arg());
        if let Some(upstream_arg) = &upstream_arg {
            args.push(upstream_arg.clone());
        }
        args.push(branch.as_str().to_string());

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.run(&arg_refs)?;

        if output.status.success() {
            return Ok(RebaseOutcome::Success);
        }

        if self.rebase_in_progress() {
            return Ok(RebaseOutcome::Conflicts);
        }

        Err(EngineError::VcsError {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn rebase_in_progress(&self) -> bool {
        let output = match self.run(&["rev-parse", "--git-path", "rebase-merge"]) {
            Ok(o) => o,
            Err(_) => return false,
        };
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        self.workdir.join(path).exists()
    }

    pub fn rebase_abort(&self) -> Result<(), EngineError> {
        self.run_ok(&["rebase", "--abort"])
    }

    pub fn checkout(&self, branch: &BranchName) -> Result<(), EngineError> {
        self.run_ok(&["checkout", branch.as_str()])
    }

    pub fn pull_rebase(&self) -> Result<(), EngineError> {
        self.run_ok(&["pull", "--rebase"])
    }

    pub fn push(&self, remote: &str, branches: &[BranchName], options: &[&str]) -> Result<(), EngineError> {
        let mut args: Vec<&str> = vec!["push"];
        args.extend_from_slice(options);
        args.push(remote);
        let names: Vec<&str> = branches.iter().map(BranchName::as_str).collect();
        args.extend(names);
        self.run_ok(&args)
    }

    pub fn delete_remote(&self, remote: &str, branches: &[BranchName]) -> Result<(), EngineError> {
        let mut args: Vec<&str> = vec!["push", remote, "--delete"];
        let names: Vec<&str> = branches.iter().map(BranchName::as_str).collect();
        args.extend(names);
        self.run_ok(&args)
    }

    pub fn fetch(&self, remote: &str, prune: bool) -> Result<(), EngineError> {
        let mut args: Vec<&str> = vec!["fetch", remote];
        if prune {
            args.push("--prune");
        }
        self.run_ok(&args)
    }

    /// Force-delete local branches (used after a confirmed cleanup prompt).
    pub fn delete_local(&self, branches: &[BranchName]) -> Result<(), EngineError> {
        let mut args: Vec<&str> = vec!["branch", "-D"];
        let names: Vec<&str> = branches.iter().map(BranchName::as_str).collect();
        args.extend(names);
        self.run_ok(&args)
    }

    /// Local branches whose upstream tracking ref is gone (`git fetch --prune`
    /// already ran; these show as `[gone]` in `git branch -vv`).
    pub fn branches_with_gone_upstream(&self) -> Result<Vec<BranchName>, EngineError> {
        let stdout = self.run_stdout(&["for-each-ref", "--format=%(refname:short) %(upstream:track)", "refs/heads/"])?;
        Ok(stdout
            .lines()
            .filter(|l| l.contains("[gone]"))
            .filter_map(|l| l.split_whitespace().next())
            .map(BranchName::new)
            .collect())
    }
}
