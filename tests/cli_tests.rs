#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn run_cli(store: &Path, script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.arg("--store")
        .arg(store)
        .arg("--date")
        .arg("2024-03-01")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_requires_login() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir.path().join("store.json"), "classes\nquit\n")
        .success()
        .stdout(str_contains("Not logged in."));
}

#[test]
fn cli_signup_rejects_mismatched_passwords() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir.path().join("store.json"), "signup prof pw other\nquit\n")
        .success()
        .stdout(str_contains("Passwords do not match"));
}

#[test]
fn cli_rejects_wrong_email_domain() {
    let dir = TempDir::new().unwrap();
    run_cli(
        &dir.path().join("store.json"),
        "signup prof pw pw\nclass add Algorithms\nselect Algorithms\n\
         student add eve@example.com Eve\nquit\n",
    )
    .success()
    .stdout(str_contains("Email must end with @tufts.edu"));
}

#[test]
fn cli_marks_attendance_and_exports() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store.json");
    let export_dir = dir.path().join("out");
    fs::create_dir(&export_dir).unwrap();

    let script = format!(
        "signup prof pw pw\nclass add Test Class\nselect Test Class\n\
         student add john@tufts.edu John Doe\nall\nexport {}\nquit\n",
        export_dir.display()
    );
    run_cli(&store, &script)
        .success()
        .stdout(str_contains("Marked all present on 2024-03-01."))
        .stdout(str_contains("Exported to"));

    let csv = fs::read_to_string(export_dir.join("Test Class_attendance.csv")).unwrap();
    assert_eq!(
        csv,
        "Student Name,Email,2024-03-01,Overall Attendance\nJohn Doe,john@tufts.edu,Present,100%\n"
    );
}

#[test]
fn cli_persists_classes_between_sessions() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store.json");

    run_cli(&store, "signup prof pw pw\nclass add Algorithms\nquit\n").success();
    run_cli(&store, "login prof pw\nclasses\nquit\n")
        .success()
        .stdout(str_contains("Logged in as prof (1 classes)."))
        .stdout(str_contains("Algorithms"));
    run_cli(&store, "login prof wrong\nquit\n")
        .success()
        .stdout(str_contains("Invalid credentials"));
}

#[test]
fn cli_ignores_attendance_for_unknown_student() {
    let dir = TempDir::new().unwrap();
    run_cli(
        &dir.path().join("store.json"),
        "signup prof pw pw\nclass add Algorithms\nselect Algorithms\n\
         present ghost\nhistory\nquit\n",
    )
    .success()
    .stdout(str_contains("No student with id ghost."))
    .stdout(str_contains("No attendance records."));
}
