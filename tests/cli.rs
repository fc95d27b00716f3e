use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn write_corpus(root: &std::path::Path) {
    fs::create_dir_all(root.join("handoffs")).unwrap();
    fs::write(
        root.join("crossdock.yaml"),
        "repo: local-repo\nverification_commands:\n  - \"true\"\n",
    )
    .unwrap();
    fs::write(
        root.join("handoffs/031-auth-tokens.md"),
        "---\nhandoff_id: 031-auth-tokens\ndirection: incoming\nfrom_repo: upstream\nto_repo: local-repo\ncreated_at: \"2026-03-01T12:00:00Z\"\nstatus: new\nrequires:\n  - type: api\n    description: add a new route\n---\n\n- [ ] update the users table schema\n",
    )
    .unwrap();
}

fn crossdock(root: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("crossdock").unwrap();
    cmd.current_dir(root);
    cmd
}

#[test]
fn detect_reports_new_handoffs_then_settles() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());

    crossdock(dir.path())
        .arg("detect")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 new since last run"))
        .stdout(predicate::str::contains("031-auth-tokens"));

    // Second run: the state file has the hash, nothing is new.
    crossdock(dir.path())
        .arg("detect")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 new since last run"));
}

#[test]
fn plan_then_complete_drives_the_checklist() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());

    crossdock(dir.path())
        .args(["plan", "031-auth-tokens"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 requirements"))
        .stdout(predicate::str::contains("REQ-001"));

    // Regeneration is refused.
    crossdock(dir.path())
        .args(["plan", "031-auth-tokens"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    crossdock(dir.path())
        .args(["complete", "031-auth-tokens", "REQ-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/2"))
        .stdout(predicate::str::contains("in_progress"));

    crossdock(dir.path())
        .args(["complete", "031-auth-tokens", "REQ-002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2/2"))
        .stdout(predicate::str::contains("testing"));
}

#[test]
fn block_raises_an_outgoing_handoff() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());

    crossdock(dir.path())
        .args(["block", "031-auth-tokens", "--reason", "upstream schema missing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("032-unblock-auth-tokens"));

    let original = fs::read_to_string(dir.path().join("handoffs/031-auth-tokens.md")).unwrap();
    assert!(original.contains("status: blocked"));
    assert!(original.contains("blocker_handoff: 032-unblock-auth-tokens"));

    let blocker =
        fs::read_to_string(dir.path().join("handoffs/outgoing/032-unblock-auth-tokens.md"))
            .unwrap();
    assert!(blocker.contains("direction: outgoing"));
    assert!(blocker.contains("upstream schema missing"));
}

#[test]
fn status_lists_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());

    crossdock(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("031-auth-tokens"))
        .stdout(predicate::str::contains("plan: -"));
}

#[test]
fn schema_prints_config_schema() {
    let dir = tempfile::tempdir().unwrap();
    crossdock(dir.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("handoff_dir"));
}
