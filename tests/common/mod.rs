use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Path to the built `sr` binary.
pub fn sr_binary() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("target");
    path.push("debug");
    path.push("sr");
    path
}

/// Initialize a test git repository with one commit on `main`.
#[allow(dead_code)]
pub fn init_test_repo(dir: &Path) -> Result<()> {
    run_git(dir, &["init", "-q", "-b", "main"])?;
    run_git(dir, &["config", "user.name", "Test User"])?;
    run_git(dir, &["config", "user.email", "test@example.com"])?;
    run_git(dir, &["config", "core.editor", "true"])?;
    run_git(dir, &["config", "sequence.editor", "true"])?;

    fs::write(dir.join("README.md"), "# Test Repo\n")?;
    run_git(dir, &["add", "."])?;
    run_git(dir, &["commit", "-q", "-m", "initial"])?;

    Ok(())
}

/// Run the `sr` binary against `dir` with a closed stdin (so confirm
/// prompts default to declined, matching real non-interactive invocations).
#[allow(dead_code)]
pub fn run_sr(dir: &Path, args: &[&str]) -> Result<std::process::Output> {
    Ok(Command::new(sr_binary())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()?)
}

#[allow(dead_code)]
pub fn get_current_branch(dir: &Path) -> Result<String> {
    let output = run_git(dir, &["branch", "--show-current"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[allow(dead_code)]
pub fn run_git(dir: &Path, args: &[&str]) -> Result<std::process::Output> {
    Ok(Command::new("git").args(args).current_dir(dir).output()?)
}

#[allow(dead_code)]
pub fn git_branch_exists(dir: &Path, name: &str) -> Result<bool> {
    let output = run_git(dir, &["branch", "--list", name])?;
    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
}

#[allow(dead_code)]
pub fn get_commit_hash(dir: &Path, branch: &str) -> Result<String> {
    let output = run_git(dir, &["rev-parse", branch])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[allow(dead_code)]
pub fn commit_file(dir: &Path, filename: &str, content: &str, message: &str) -> Result<()> {
    fs::write(dir.join(filename), content)?;
    run_git(dir, &["add", "."])?;
    run_git(dir, &["commit", "-q", "-m", message])?;
    Ok(())
}

#[allow(dead_code)]
pub fn checkout_new_branch(dir: &Path, name: &str) -> Result<()> {
    run_git(dir, &["checkout", "-q", "-b", name])?;
    Ok(())
}

#[allow(dead_code)]
pub fn checkout(dir: &Path, name: &str) -> Result<()> {
    run_git(dir, &["checkout", "-q", name])?;
    Ok(())
}
