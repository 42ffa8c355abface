//! Integration tests for the metricate binary
//!
//! Each test runs the built executable the way a shell pipeline or a bot
//! wrapper would.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn metricate() -> Command {
    Command::new(env!("CARGO_BIN_EXE_metricate"))
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Run with `input` piped to stdin
fn run_piped(args: &[&str], input: &str) -> Output {
    let mut child = metricate()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn metricate");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_single_message() {
    let output = metricate().arg("I am 10 feet tall").output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "I am 3 m tall\n");
}

#[test]
fn test_unchanged_message_echoed() {
    let output = metricate().arg("nothing to see").output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "nothing to see\n");
}

#[test]
fn test_pipe_mode_converts_each_line() {
    let output = run_piped(&[], "10 feet and 4 inches\nhello\n6 pounds, 2.1 ounces\n");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "3.15 m\nhello\n2.78 kg\n");
}

#[test]
fn test_locale_flag() {
    let output = metricate()
        .args(["-l", "de-DE", "10,5 feet"])
        .output()
        .unwrap();
    assert_eq!(stdout_of(&output), "3,20 m\n");
}

#[test]
fn test_unknown_locale_fails() {
    let output = metricate()
        .args(["-l", "xx-XX", "10 feet"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("xx-XX"));
}

#[test]
fn test_list_units() {
    let output = metricate().arg("--list-units").output().unwrap();
    assert!(output.status.success());
    let listing = stdout_of(&output);
    assert!(listing.lines().any(|l| l.starts_with("distance: ") && l.contains("foot")));
    assert!(listing.lines().any(|l| l.starts_with("mass: ") && l.contains("pound")));
}

#[test]
fn test_missing_units_file() {
    let output = metricate()
        .args(["-u", "/nonexistent/units.json", "10 feet"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
