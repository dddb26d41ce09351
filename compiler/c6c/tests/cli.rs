//! End-to-end runs of the `c6c` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write as _;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

fn c6c(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_c6c"))
        .args(args)
        .env_remove("C6_LOG")
        .env_remove("RUST_LOG")
        .env_remove("C6_THREADS")
        .output()
        .unwrap()
}

fn source_file(text: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".c6").tempfile().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_help() {
    let out = c6c(&["help"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage: c6c <command>"));
}

#[test]
fn test_unknown_command_fails() {
    let out = c6c(&["frobnicate"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown command: frobnicate"));
}

#[test]
fn test_check_exit_status() {
    let good = source_file("main :: func() { return; }");
    let bad = source_file("main :: func() { return }");
    let good_path = good.path().to_str().unwrap();
    let bad_path = bad.path().to_str().unwrap();

    let out = c6c(&["check", good_path, "--threads", "2"]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "checked 1 file: 0 failed\n");

    let out = c6c(&["check", good_path, bad_path]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("error[E"), "{stderr}");
    assert!(stderr.contains(bad_path), "{stderr}");
}

#[test]
fn test_bad_option_exit_status() {
    let out = c6c(&["check", "a.c6", "--threads", "lots"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid value `lots` for `--threads`"));
}

#[test]
fn test_parse_prints_tree() {
    let file = source_file("x := 1 + 2;");
    let out = c6c(&["parse", file.path().to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("BinaryOp +"), "{stdout}");
}
