//! Common utilities for integration tests

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

pub fn lazydi_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lazydi"))
}

/// Write `content` to `name` inside a fresh temp directory.
pub fn write_config(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(name);
    fs::write(&path, content).unwrap();
    (temp, path)
}
