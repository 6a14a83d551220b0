mod common;

use common::*;
use tempfile::TempDir;

#[test]
fn simple_chain_rebase_replays_each_branch_once() {
    let dir = TempDir::new().unwrap();
    init_test_repo(dir.path()).unwrap();

    checkout_new_branch(dir.path(), "f/a").unwrap();
    commit_file(dir.path(), "a.txt", "a\n", "a").unwrap();
    checkout_new_branch(dir.path(), "f/b").unwrap();
    commit_file(dir.path(), "b.txt", "b\n", "b").unwrap();
    checkout_new_branch(dir.path(), "f/c").unwrap();
    commit_file(dir.path(), "c.txt", "c\n", "c").unwrap();

    checkout(dir.path(), "main").unwrap();
    commit_file(dir.path(), "main.txt", "update\n", "main update").unwrap();

    let output = run_sr(dir.path(), &["rebase-prefix", "f/"]).unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let main_hash = get_commit_hash(dir.path(), "main").unwrap();
    let a_hash = get_commit_hash(dir.path(), "f/a").unwrap();
    let b_hash = get_commit_hash(dir.path(), "f/b").unwrap();
    let c_hash = get_commit_hash(dir.path(), "f/c").unwrap();

    let is_ancestor = |ancestor: &str, descendant: &str| {
        run_git(dir.path(), &["merge-base", "--is-ancestor", ancestor, descendant])
            .unwrap()
            .status
            .success()
    };

    assert!(is_ancestor(&main_hash, &a_hash));
    assert!(is_ancestor(&a_hash, &b_hash));
    assert!(is_ancestor(&b_hash, &c_hash));
}

#[test]
fn forking_stack_replays_shared_prefix_once() {
    let dir = TempDir::new().unwrap();
    init_test_repo(dir.path()).unwrap();

    checkout_new_branch(dir.path(), "test-chain-d").unwrap();
    commit_file(dir.path(), "d.txt", "d\n", "d").unwrap();
    checkout_new_branch(dir.path(), "test-chain-e").unwrap();
    commit_file(dir.path(), "e.txt", "e\n", "e").unwrap();
    checkout_new_branch(dir.path(), "test-chain-f").unwrap();
    commit_file(dir.path(), "f.txt", "f\n", "f").unwrap();

    checkout_new_branch(dir.path(), "test-chain-g").unwrap();
    commit_file(dir.path(), "g.txt", "g\n", "g").unwrap();

    checkout(dir.path(), "test-chain-f").unwrap();
    checkout_new_branch(dir.path(), "test-chain-j").unwrap();
    commit_file(dir.path(), "j.txt", "j\n", "j").unwrap();

    checkout(dir.path(), "main").unwrap();
    commit_file(dir.path(), "main.txt", "update\n", "main update").unwrap();

    let output = run_sr(dir.path(), &["rebase-prefix", "test-chain-"]).unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let f_hash = get_commit_hash(dir.path(), "test-chain-f").unwrap();
    let g_hash = get_commit_hash(dir.path(), "test-chain-g").unwrap();
    let j_hash = get_commit_hash(dir.path(), "test-chain-j").unwrap();
    let main_hash = get_commit_hash(dir.path(), "main").unwrap();

    let is_ancestor = |ancestor: &str, descendant: &str| {
        run_git(dir.path(), &["merge-base", "--is-ancestor", ancestor, descendant])
            .unwrap()
            .status
            .success()
    };

    assert!(is_ancestor(&main_hash, &f_hash));
    assert!(is_ancestor(&f_hash, &g_hash));
    assert!(is_ancestor(&f_hash, &j_hash));
}

#[test]
fn squash_merged_branch_is_skipped() {
    let dir = TempDir::new().unwrap();
    init_test_repo(dir.path()).unwrap();

    checkout_new_branch(dir.path(), "f/a").unwrap();
    commit_file(dir.path(), "a1.txt", "a1\n", "a1").unwrap();
    commit_file(dir.path(), "a2.txt", "a2\n", "a2").unwrap();

    checkout(dir.path(), "main").unwrap();
    run_git(dir.path(), &["merge", "--squash", "f/a"]).unwrap();
    run_git(dir.path(), &["commit", "-q", "-m", "squash f/a"]).unwrap();

    let output = run_sr(dir.path(), &["rebase-prefix", "f/"]).unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Skipped"), "expected a Skipped section, got: {stdout}");

    // Closed stdin declines the cleanup prompt, so f/a survives.
    assert!(git_branch_exists(dir.path(), "f/a").unwrap());
}

#[test]
fn conflict_is_reversible() {
    let dir = TempDir::new().unwrap();
    init_test_repo(dir.path()).unwrap();

    commit_file(dir.path(), "shared.txt", "base\n", "base").unwrap();
    checkout_new_branch(dir.path(), "f/a").unwrap();
    commit_file(dir.path(), "shared.txt", "feature change\n", "feature change").unwrap();

    checkout(dir.path(), "main").unwrap();
    commit_file(dir.path(), "shared.txt", "main change\n", "main change").unwrap();

    let before = get_commit_hash(dir.path(), "f/a").unwrap();

    let output = run_sr(dir.path(), &["rebase-prefix", "f/"]).unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Manual intervention required"), "got: {stdout}");

    let after = get_commit_hash(dir.path(), "f/a").unwrap();
    assert_eq!(before, after, "f/a must be unchanged after an aborted rebase");

    let status = run_git(dir.path(), &["status", "--porcelain"]).unwrap();
    assert!(String::from_utf8_lossy(&status.stdout).trim().is_empty(), "working tree must be clean");
}
