//! tests/util.rs
//! Small helpers shared across integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Absolute path to the freshly-built `docket` binary.
pub fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_docket"))
}

/// Build a `Command` for `docket` whose `DOCKET_DB_PATH` is
/// `<tmp>/docket.db`.
///
/// Each call yields a brand-new `Command`, so callers can freely add
/// arguments, stdin, etc., without affecting other invocations.
pub fn docket(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env("DOCKET_DB_PATH", tmp.path().join("docket.db"));
    cmd.env_remove("RUST_LOG");
    cmd
}

/// `docket document add <path>` with `json` on STDIN; must succeed.
pub fn add(tmp: &TempDir, path: &str, json: &str) {
    docket(tmp)
        .args(["document", "add", path])
        .write_stdin(json)
        .assert()
        .success();
}
