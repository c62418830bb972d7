//! End-to-end tests for the `notestore` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn notestore(db: &Path, owner: &str) -> Command {
    let mut cmd = Command::cargo_bin("notestore").unwrap();
    cmd.env_remove("NOTESTORE_DB_PATH")
        .env_remove("NOTESTORE_LOG_DIR")
        .env_remove("NOTESTORE_POOL_SIZE")
        .arg("--db")
        .arg(db)
        .arg("--owner")
        .arg(owner);
    cmd
}

fn add_note(db: &Path, owner: &str, body: &str) -> String {
    let output = notestore(db, owner)
        .args(["add", "--title", "Shopping", "--body", body, "--tag", "home"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["noteId"].as_str().unwrap().to_string()
}

#[test]
fn ping_does_not_need_an_owner() {
    Command::cargo_bin("notestore")
        .unwrap()
        .arg("ping")
        .assert()
        .success()
        .stdout(predicate::str::contains("ping=pong"));
}

#[test]
fn add_then_show_by_owner() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("notes.db");
    let id = add_note(&db, "u1", "milk, eggs");

    notestore(&db, "u1")
        .args(["show", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("milk, eggs"))
        .stdout(predicate::str::contains("\"owner\":\"u1\""));
}

#[test]
fn other_owner_is_forbidden() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("notes.db");
    let id = add_note(&db, "u1", "private");

    notestore(&db, "u2")
        .args(["show", id.as_str()])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unauthorized (403)"));

    notestore(&db, "u2")
        .args(["rm", id.as_str()])
        .assert()
        .code(4);

    notestore(&db, "u1")
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("private"));
}

#[test]
fn edit_requires_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("notes.db");
    let id = add_note(&db, "u1", "draft");

    notestore(&db, "u1")
        .args(["edit", id.as_str(), "--title", "final"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("validation_failure (400)"));

    notestore(&db, "u1")
        .args(["edit", id.as_str(), "--title", "final", "--body", "done", "--clear-tags"])
        .assert()
        .success();

    notestore(&db, "u1")
        .args(["show", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\":\"final\""))
        .stdout(predicate::str::contains("\"tags\":[]"));
}

#[test]
fn deleted_note_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("notes.db");
    let id = add_note(&db, "u1", "temporary");

    notestore(&db, "u1").args(["rm", id.as_str()]).assert().success();

    notestore(&db, "u1")
        .args(["show", id.as_str()])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("not_found (404)"));
}

#[test]
fn missing_owner_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("notestore")
        .unwrap()
        .env_remove("NOTESTORE_OWNER")
        .arg("--db")
        .arg(dir.path().join("notes.db"))
        .arg("ls")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--owner"));
}

#[test]
fn add_and_edit_store_tags_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("notes.db");
    let id = add_note(&db, "u1", "tagged");

    notestore(&db, "u1")
        .args([
            "edit",
            id.as_str(),
            "--title",
            "t",
            "--body",
            "tagged",
            "--tag",
            " a",
            "--tag",
            "x,y",
            "--tag",
            " a",
        ])
        .assert()
        .success();

    let output = notestore(&db, "u1")
        .args(["show", id.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["note"]["tags"], serde_json::json!([" a", "x,y", " a"]));
}

#[test]
fn edit_rejects_tags_combined_with_clear() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("notes.db");
    let id = add_note(&db, "u1", "tagged");

    notestore(&db, "u1")
        .args([
            "edit",
            id.as_str(),
            "--title",
            "t",
            "--body",
            "b",
            "--tag",
            "a",
            "--clear-tags",
        ])
        .assert()
        .code(2);
}
