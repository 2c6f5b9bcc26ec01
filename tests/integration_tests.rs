use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_description(dir: &Path, name: &str, content: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content.to_string()).unwrap();
    path
}

fn sysdiff() -> Command {
    Command::cargo_bin("sysdiff").unwrap()
}

fn machine_a() -> serde_json::Value {
    serde_json::json!({
        "os": {"name": "openSUSE", "version": "13.2", "architecture": "x86_64"},
        "packages": {
            "_attributes": {"package_system": "rpm"},
            "_elements": [
                {"name": "bash", "version": "4.3"},
                {"name": "vim", "version": "7.4"}
            ]
        }
    })
}

fn machine_b() -> serde_json::Value {
    serde_json::json!({
        "os": {"name": "openSUSE", "version": "13.2", "architecture": "x86_64"},
        "packages": {
            "_attributes": {"package_system": "rpm"},
            "_elements": [
                {"name": "bash", "version": "4.4"},
                {"name": "vim", "version": "7.4"}
            ]
        }
    })
}

#[test]
fn test_identical_files_exit_zero() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());
    let b = write_description(dir.path(), "machine_b.json", &machine_a());

    sysdiff()
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("No differences."));
}

#[test]
fn test_differing_files_exit_one() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());
    let b = write_description(dir.path(), "machine_b.json", &machine_b());

    sysdiff()
        .arg(&a)
        .arg(&b)
        .args(["--format", "plain"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Only in 'machine_a':"))
        .stdout(predicate::str::contains("Only in 'machine_b':"))
        .stdout(predicate::str::contains("bash (version: 4.3)"))
        .stdout(predicate::str::contains("bash (version: 4.4)"));
}

#[test]
fn test_missing_file_exit_two() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());

    sysdiff()
        .arg(&a)
        .arg(dir.path().join("nope.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_invalid_json_exit_two() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{not json").unwrap();

    sysdiff()
        .arg(&a)
        .arg(&broken)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid JSON"));
}

#[test]
fn test_invalid_description_exit_two() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());
    let bad = write_description(
        dir.path(),
        "bad.json",
        &serde_json::json!({"os": {"mood": "great"}}),
    );

    sysdiff()
        .arg(&a)
        .arg(&bad)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("mood"));
}

#[test]
fn test_scope_selection() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());
    let b = write_description(dir.path(), "machine_b.json", &machine_b());

    // os is identical, so restricting the run to it finds nothing
    sysdiff()
        .arg(&a)
        .arg(&b)
        .args(["--scope", "os", "--format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# os"))
        .stdout(predicate::str::contains("packages").not());
}

#[test]
fn test_json_format_output() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());
    let b = write_description(dir.path(), "machine_b.json", &machine_b());

    let output = sysdiff()
        .arg(&a)
        .arg(&b)
        .args(["--scope", "packages", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let raw: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(raw["scope"], "packages");
    assert_eq!(raw["name_a"], "machine_a");
    assert_eq!(raw["name_b"], "machine_b");
    assert_eq!(raw["only_in_a"][0]["name"], "bash");
    assert_eq!(raw["only_in_a"][0]["version"], "4.3");
    assert_eq!(raw["only_in_b"][0]["version"], "4.4");
}

#[test]
fn test_exclude_hides_elements() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());
    let b = write_description(dir.path(), "machine_b.json", &machine_b());

    sysdiff()
        .arg(&a)
        .arg(&b)
        .args(["--format", "plain", "--exclude", "/packages/name=bash"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("bash").not());
}

#[test]
fn test_pair_by_shows_before_and_after() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());
    let b = write_description(dir.path(), "machine_b.json", &machine_b());

    sysdiff()
        .arg(&a)
        .arg(&b)
        .args(["--format", "plain", "--pair-by", "name"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("In both with different attributes:"))
        .stdout(predicate::str::contains("* bash (version: 4.3)"))
        .stdout(predicate::str::contains("-> bash (version: 4.4)"))
        .stdout(predicate::str::contains("Only in").not());
}

#[test]
fn test_show_common() {
    let dir = TempDir::new().unwrap();
    let a = write_description(dir.path(), "machine_a.json", &machine_a());
    let b = write_description(dir.path(), "machine_b.json", &machine_b());

    sysdiff()
        .arg(&a)
        .arg(&b)
        .args(["--scope", "packages", "--format", "plain", "--show-common"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Common:"))
        .stdout(predicate::str::contains("vim (version: 7.4)"));
}
