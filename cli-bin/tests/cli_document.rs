//! tests cli_document.rs
//! `docket document …` round trips through the real binary.

use predicates::str;
use tempfile::tempdir;

mod util;
use util::{add, docket};

#[test]
fn add_then_get_pretty_prints() {
    let tmp = tempdir().unwrap();
    add(&tmp, "/users/alice", r#"{"name":"Alice","tags":["<a>"]}"#);

    docket(&tmp)
        .args(["document", "get", "/users/alice"])
        .assert()
        .success()
        .stdout(str::contains("  \"name\": \"Alice\""))
        // no HTML escaping
        .stdout(str::contains("\"<a>\""));
}

#[test]
fn copy_and_move() {
    let tmp = tempdir().unwrap();
    add(&tmp, "/users/alice", r#"{"n":1}"#);

    docket(&tmp)
        .args(["doc", "cp", "/users/alice", "/archive/alice"])
        .assert()
        .success();
    docket(&tmp)
        .args(["doc", "mv", "/users/alice", "/users/alice2"])
        .assert()
        .success()
        .stdout(str::contains("Moved"));

    docket(&tmp)
        .args(["document", "get", "/users/alice"])
        .assert()
        .failure()
        .stderr(str::contains("document not found"));
    docket(&tmp)
        .args(["document", "get", "/archive/alice"])
        .assert()
        .success()
        .stdout(str::contains("\"n\": 1"));
    docket(&tmp)
        .args(["document", "get", "/users/alice2"])
        .assert()
        .success();
}

#[test]
fn delete_removes_document() {
    let tmp = tempdir().unwrap();
    add(&tmp, "/users/bob", "{}");

    docket(&tmp)
        .args(["document", "rm", "/users/bob"])
        .assert()
        .success();
    docket(&tmp)
        .args(["collection", "ls", "/users"])
        .assert()
        .success()
        .stdout(str::is_empty());
}

#[test]
fn json_format_reports_mutations() {
    let tmp = tempdir().unwrap();
    docket(&tmp)
        .args(["--format", "json", "document", "add", "/a/b"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(str::contains(r#"{"created":"/a/b"}"#));
}

#[test]
fn project_flag_selects_database_file() {
    let tmp = tempdir().unwrap();
    let mut cmd = assert_cmd::Command::new(util::bin());
    cmd.env_remove("DOCKET_DB_PATH")
        .env_remove("PROJECT_ID")
        .env("XDG_DATA_HOME", tmp.path())
        .env("HOME", tmp.path())
        .args(["--project", "demo", "document", "add", "/a/b"])
        .write_stdin("{}")
        .assert()
        .success();

    let found = walk(tmp.path())
        .into_iter()
        .any(|p| p.file_name().map_or(false, |n| n == "demo.db"));
    assert!(found, "expected demo.db somewhere under the data dir");
}

fn walk(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut out = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for e in entries.flatten() {
            let p = e.path();
            if p.is_dir() {
                out.extend(walk(&p));
            } else {
                out.push(p);
            }
        }
    }
    out
}
