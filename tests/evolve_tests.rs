mod common;

use common::*;
use tempfile::TempDir;

#[test]
fn evolve_finds_orphans_but_declines_without_a_tty() {
    let dir = TempDir::new().unwrap();
    init_test_repo(dir.path()).unwrap();

    checkout_new_branch(dir.path(), "f/a").unwrap();
    commit_file(dir.path(), "a1.txt", "a1\n", "a1").unwrap();
    checkout_new_branch(dir.path(), "f/b").unwrap();
    commit_file(dir.path(), "b1.txt", "b1\n", "b1").unwrap();
    checkout_new_branch(dir.path(), "f/c").unwrap();
    commit_file(dir.path(), "c1.txt", "c1\n", "c1").unwrap();

    checkout(dir.path(), "f/a").unwrap();
    commit_file(dir.path(), "a1.txt", "a2\n", "a2").unwrap();
    run_git(dir.path(), &["commit", "-q", "--amend", "-m", "a2"]).unwrap();

    let b_before = get_commit_hash(dir.path(), "f/b").unwrap();
    let c_before = get_commit_hash(dir.path(), "f/c").unwrap();

    // The test harness never attaches a TTY to stdin, so the confirmation
    // prompt defaults to declined and the batch is cancelled cleanly.
    let output = run_sr(dir.path(), &["evolve"]).unwrap();
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cancelled"), "got: {stdout}");

    assert_eq!(get_commit_hash(dir.path(), "f/b").unwrap(), b_before);
    assert_eq!(get_commit_hash(dir.path(), "f/c").unwrap(), c_before);
}

#[test]
fn evolve_with_nothing_orphaned_reports_nothing_to_do() {
    let dir = TempDir::new().unwrap();
    init_test_repo(dir.path()).unwrap();

    commit_file(dir.path(), "a.txt", "a\n", "a").unwrap();
    commit_file(dir.path(), "b.txt", "b\n", "b").unwrap();

    let output = run_sr(dir.path(), &["evolve"]).unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nothing to evolve"), "got: {stdout}");
}
