use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn shift(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shift").unwrap();
    cmd.current_dir(dir.path())
        .env("SHIFT_DATA_DIR", dir.path().join("data"));
    cmd
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// shift task
// ---------------------------------------------------------------------------

#[test]
fn task_list_seeds_the_default_task() {
    let dir = TempDir::new().unwrap();
    shift(&dir)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write 500 words"));
}

#[test]
fn task_add_appears_in_the_list() {
    let dir = TempDir::new().unwrap();
    shift(&dir)
        .args(["task", "add", "Ship", "the", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added "));

    shift(&dir)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ship the demo"));
}

#[test]
fn task_add_rejects_blank_text() {
    let dir = TempDir::new().unwrap();
    shift(&dir)
        .args(["task", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task text must not be empty"));
}

#[test]
fn toggling_the_only_task_advances_the_streak() {
    let dir = TempDir::new().unwrap();
    let output = shift(&dir)
        .args(["--json", "task", "list"])
        .output()
        .unwrap();
    let tasks = json_stdout(&output);
    let id = tasks[0]["id"].as_str().unwrap().to_string();

    let output = shift(&dir)
        .args(["--json", "task", "toggle", &id])
        .output()
        .unwrap();
    assert!(output.status.success());
    let update = json_stdout(&output);
    assert_eq!(update["state"]["current"], 1);
    assert_eq!(update["phase"], "completed");

    shift(&dir)
        .args(["streak"])
        .assert()
        .success()
        .stdout(predicate::str::contains("streak:   1 days"))
        .stdout(predicate::str::contains("Day 1 Warrior"));
}

#[test]
fn deleting_an_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    shift(&dir)
        .args(["task", "delete", "no-such-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found"));
}

// ---------------------------------------------------------------------------
// shift streak / context
// ---------------------------------------------------------------------------

#[test]
fn streak_on_a_fresh_store_is_zero() {
    let dir = TempDir::new().unwrap();
    shift(&dir)
        .args(["streak"])
        .assert()
        .success()
        .stdout(predicate::str::contains("streak:   0 days"))
        .stdout(predicate::str::contains("next milestone: 7 days"));
}

#[test]
fn context_on_a_fresh_store_reports_no_activity() {
    let dir = TempDir::new().unwrap();
    shift(&dir)
        .args(["context"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no activity recorded yet)"));
}

#[test]
fn context_reflects_recorded_activity() {
    let dir = TempDir::new().unwrap();
    let output = shift(&dir)
        .args(["--json", "task", "list"])
        .output()
        .unwrap();
    let id = json_stdout(&output)[0]["id"].as_str().unwrap().to_string();
    shift(&dir).args(["task", "toggle", &id]).assert().success();

    shift(&dir)
        .args(["context"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1-day completion streak"))
        .stdout(predicate::str::contains("Write 500 words"));
}

// ---------------------------------------------------------------------------
// shift timeline
// ---------------------------------------------------------------------------

#[test]
fn timeline_list_seeds_the_first_plan() {
    let dir = TempDir::new().unwrap();
    shift(&dir)
        .args(["timeline", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My First Plan"));
}

#[test]
fn timeline_create_rename_delete() {
    let dir = TempDir::new().unwrap();
    let output = shift(&dir)
        .args(["--json", "timeline", "new", "Launch Week"])
        .output()
        .unwrap();
    let id = json_stdout(&output)["id"].as_str().unwrap().to_string();

    shift(&dir)
        .args(["timeline", "rename", &id, "Launch Month"])
        .assert()
        .success();
    shift(&dir)
        .args(["timeline", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Launch Month"));

    shift(&dir)
        .args(["timeline", "delete", &id])
        .assert()
        .success();
}

#[test]
fn deleting_the_last_timeline_fails() {
    let dir = TempDir::new().unwrap();
    let output = shift(&dir)
        .args(["--json", "timeline", "list"])
        .output()
        .unwrap();
    let id = json_stdout(&output)["timelines"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    shift(&dir)
        .args(["timeline", "delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("last remaining timeline"));
}

#[test]
fn export_prints_the_greeting_draft() {
    let dir = TempDir::new().unwrap();
    shift(&dir).args(["timeline", "list"]).assert().success();

    shift(&dir)
        .args(["timeline", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My First Plan"))
        .stdout(predicate::str::contains("planning assistant"));
}
