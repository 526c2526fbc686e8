use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskpad-{nanos}-{file_name}"))
}

fn seed_store(store_path: &Path) {
    let content = serde_json::json!({
        "schema_version": 1,
        "entries": {
            "task:2026-01-01T10:00:00Z": {
                "text": "old text",
                "completed": false,
                "createdAt": "2026-01-01T10:00:00Z"
            }
        }
    });
    std::fs::write(store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn read_task_text(store_path: &Path) -> String {
    let content = std::fs::read_to_string(store_path).expect("store file");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("store json");
    parsed["entries"]["task:2026-01-01T10:00:00Z"]["text"]
        .as_str()
        .expect("task text")
        .to_string()
}

fn run_interactive(input: &str, store_path: &Path) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_taskpad");

    let mut child = Command::new(exe)
        .env("TASKPAD_STORE_PATH", store_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    child
        .wait_with_output()
        .expect("failed to read interactive output")
}

#[test]
fn interactive_help_shows_usage() {
    let store_path = temp_path("interactive-help.json");
    let output = run_interactive("help\nexit\n", &store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_invalid_command_prints_error() {
    let store_path = temp_path("interactive-invalid.json");
    let output = run_interactive("nope\nexit\n", &store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn interactive_add_command_succeeds() {
    let store_path = temp_path("interactive-add.json");
    let output = run_interactive("add \"demo task\"\nexit\n", &store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: demo task"));
}

#[test]
fn interactive_edit_then_save_persists_new_text() {
    let store_path = temp_path("interactive-edit-save.json");
    seed_store(&store_path);

    let output = run_interactive("edit 1\nsave \"renamed\"\nexit\n", &store_path);
    let text = read_task_text(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Editing task 1: old text"));
    assert!(stdout.contains("Updated task: renamed"));
    assert_eq!(text, "renamed");
}

#[test]
fn interactive_edit_then_cancel_keeps_old_text() {
    let store_path = temp_path("interactive-edit-cancel.json");
    seed_store(&store_path);

    let output = run_interactive("edit 1\ncancel\nexit\n", &store_path);
    let text = read_task_text(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Edit cancelled."));
    assert_eq!(text, "old text");
}

#[test]
fn interactive_save_without_edit_prints_error() {
    let store_path = temp_path("interactive-save-idle.json");
    seed_store(&store_path);

    let output = run_interactive("save \"anything\"\nexit\n", &store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no edit in progress"));
}

#[test]
fn interactive_alias_expands_first_token() {
    let store_path = temp_path("interactive-alias.json");
    let config_path = temp_path("interactive-alias-config.json");
    let config = serde_json::json!({
        "aliases": { "ls": "list" }
    });
    std::fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

    let exe = env!("CARGO_BIN_EXE_taskpad");
    let mut child = Command::new(exe)
        .env("TASKPAD_STORE_PATH", &store_path)
        .env("TASKPAD_CONFIG_PATH", &config_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(b"ls\nexit\n")
            .expect("failed to write to stdin");
    }

    let output = child
        .wait_with_output()
        .expect("failed to read interactive output");
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks yet."));
}

#[test]
fn interactive_list_reflects_earlier_commands() {
    let store_path = temp_path("interactive-list.json");
    let output = run_interactive("add \"first\"\nadd \"second\"\nlist\nexit\n", &store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("first"));
    assert!(stdout.contains("second"));
}
