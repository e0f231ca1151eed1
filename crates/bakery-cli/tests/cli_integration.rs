use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Fresh home directory so a user config never leaks into a test.
fn temp_home(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn bakery(home: &str) -> Command {
    let mut cmd = Command::cargo_bin("bakery").unwrap();
    cmd.env("HOME", temp_home(home)).env_remove("BAKERY_LEGACY").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_exits_zero() {
    bakery("help")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bakery"));
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn test_parse_prints_tree() {
    let fixture = fixture_path("clean.script");

    let assert = bakery("parse_tree")
        .args(["parse", fixture.to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("[Process]"));
    assert!(stdout.contains("[IniWriteOp] 2 commands"));
    assert!(stdout.contains("[Extras]"));
    assert!(stdout.contains("[TXTAddLineOp] 2 commands"));
    // data sections are not parsed
    assert!(!stdout.contains("[Main]"));
}

#[test]
fn test_parse_no_optimize() {
    let fixture = fixture_path("clean.script");

    bakery("parse_no_optimize")
        .args(["parse", fixture.to_str().unwrap(), "--section", "Process", "--no-optimize"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IniWrite,%Target%\\app.ini,General,Name,Bakery"))
        .stdout(predicate::str::contains("IniWriteOp").not());
}

#[test]
fn test_parse_json_section() {
    let fixture = fixture_path("clean.script");

    let assert = bakery("parse_json")
        .args(["parse", fixture.to_str().unwrap(), "--section", "process", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let sections = value["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["name"], "Process");

    let batch = &sections[0]["commands"][1];
    assert_eq!(batch["line"], 11);
    assert_eq!(batch["payload"]["kind"], "IniWriteOp");
    assert_eq!(batch["payload"]["args"]["cmds"].as_array().unwrap().len(), 2);
}

#[test]
fn test_parse_errors_exit_one() {
    let fixture = fixture_path("broken.script");

    bakery("parse_errors")
        .args(["parse", fixture.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error: Command [FileCopy] can have [2] ~ [5] arguments"))
        .stdout(predicate::str::contains("Cannot parse section [Blocks]"))
        .stderr(predicate::str::contains("Error: 2 error(s)"));
}

#[test]
fn test_parse_missing_file_exits_two() {
    bakery("parse_missing")
        .args(["parse", "/nonexistent/none.script"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error: I/O error"));
}

#[test]
fn test_parse_missing_section_exits_two() {
    let fixture = fixture_path("clean.script");

    bakery("parse_missing_section")
        .args(["parse", fixture.to_str().unwrap(), "--section", "Nowhere"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Nowhere"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn test_check_clean_script() {
    let fixture = fixture_path("clean.script");

    bakery("check_clean")
        .args(["check", fixture.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 1 script(s)"))
        .stdout(predicate::str::contains("(4/5 sections, 80.0% coverage)"));
}

#[test]
fn test_check_glob_reports_failures() {
    let pattern = fixture_path("*.script");

    bakery("check_glob")
        .args(["check", pattern.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Checked 2 script(s)"))
        .stdout(predicate::str::contains("Section [Missing] does not exist"))
        .stderr(predicate::str::contains("1 of 2 script(s) failed the check"));
}

#[test]
fn test_check_json() {
    let fixture = fixture_path("broken.script");

    let assert = bakery("check_json")
        .args(["check", fixture.to_str().unwrap(), "--json"])
        .assert()
        .code(1);

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let report = &value["reports"][0];
    assert_eq!(report["result"], "Error");
    assert_eq!(report["visited"], serde_json::json!(["Process", "Blocks"]));
    assert!(value["checked_at"].is_string());
}

#[test]
fn test_check_missing_file_exits_two() {
    bakery("check_missing")
        .args(["check", "/nonexistent/none.script"])
        .assert()
        .code(2);
}

// ---------------------------------------------------------------------------
// config / completions
// ---------------------------------------------------------------------------

#[test]
fn test_config_init_and_show() {
    let home = temp_home("config_init");

    let mut init = Command::cargo_bin("bakery").unwrap();
    init.env("HOME", &home).args(["config", "init"]).assert().success();
    assert!(home.join(".bakery").join("config.json").exists());

    let mut again = Command::cargo_bin("bakery").unwrap();
    again
        .env("HOME", &home)
        .args(["config", "init"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));

    let mut show = Command::cargo_bin("bakery").unwrap();
    show.env("HOME", &home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"optimize_code\": true"));
}

#[test]
fn test_completions_bash() {
    bakery("completions")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bakery"));
}
