//! End-to-end runs of the `tsmark` binary.

use std::fs;

use chrono::{Local, TimeDelta};
use tempfile::tempdir;
use tsmark_core::{FINISH_MESSAGE, START_MESSAGE, Timestamp};

use crate::common::{OUTPUT_FILE, has_timestamp_shape, run_binary_in};

#[test]
fn success_prints_two_lines_and_writes_timestamp() {
    let dir = tempdir().expect("tempdir");

    let before = Local::now().naive_local();
    let output = run_binary_in(dir.path());
    let after = Local::now().naive_local();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).expect("utf8"),
        format!("{START_MESSAGE}\n{FINISH_MESSAGE}\n")
    );
    assert!(
        output.stderr.is_empty(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = fs::read_to_string(dir.path().join(OUTPUT_FILE)).expect("read");
    assert!(has_timestamp_shape(&content), "unexpected content {content:?}");

    let written = Timestamp::parse(&content).expect("parse").as_naive();
    let tolerance = TimeDelta::seconds(2);
    assert!(written >= before - tolerance, "{written} earlier than {before}");
    assert!(written <= after + tolerance, "{written} later than {after}");
}

#[test]
fn rerun_overwrites_instead_of_appending() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(OUTPUT_FILE);

    assert!(run_binary_in(dir.path()).status.success());
    let first = fs::read_to_string(&path).expect("first read");
    assert!(run_binary_in(dir.path()).status.success());
    let second = fs::read_to_string(&path).expect("second read");

    assert!(has_timestamp_shape(&second), "unexpected content {second:?}");
    let first = Timestamp::parse(&first).expect("parse first");
    let second = Timestamp::parse(&second).expect("parse second");
    assert!(second >= first);
}

#[test]
fn directory_named_ts_txt_fails_quietly_with_success_status() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir(dir.path().join(OUTPUT_FILE)).expect("mkdir");

    let output = run_binary_in(dir.path());

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).expect("utf8"),
        format!("{START_MESSAGE}\n")
    );
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    let mut lines = stderr.lines();
    assert!(
        lines
            .next()
            .is_some_and(|l| l.starts_with("tsmark_core::errors::StampError::Open: ")),
        "diagnostic must be the only report on stderr: {stderr}"
    );
    assert!(
        lines.next().is_some_and(|l| l.starts_with("Caused by: ")),
        "stderr: {stderr}"
    );
    assert_eq!(lines.next(), Some("Stack backtrace:"), "stderr: {stderr}");
    assert!(!stderr.contains("WARN"), "stderr: {stderr}");
}

#[cfg(unix)]
#[test]
fn read_only_file_is_preserved() {
    use std::os::unix::fs::PermissionsExt;

    if crate::common::running_as_root() {
        return;
    }

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(OUTPUT_FILE);
    fs::write(&path, "keep me").expect("seed");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).expect("chmod");

    let output = run_binary_in(dir.path());

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).expect("utf8"),
        format!("{START_MESSAGE}\n")
    );
    assert!(!output.stderr.is_empty());
    assert_eq!(fs::read_to_string(&path).expect("read"), "keep me");
}

#[cfg(unix)]
#[test]
fn unwritable_directory_reports_and_exits_zero() {
    use std::os::unix::fs::PermissionsExt;

    if crate::common::running_as_root() {
        return;
    }

    let dir = tempdir().expect("tempdir");
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).expect("mkdir");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).expect("chmod");

    let output = run_binary_in(&locked);

    // Restore so tempdir cleanup can proceed.
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod back");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains(START_MESSAGE));
    assert!(!stdout.contains(FINISH_MESSAGE));
    assert!(!output.stderr.is_empty());
    assert!(!locked.join(OUTPUT_FILE).exists());
}
