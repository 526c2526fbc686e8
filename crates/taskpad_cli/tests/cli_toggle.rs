use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskpad-{nanos}-{file_name}"))
}

fn seed_store(store_path: &PathBuf) {
    let content = serde_json::json!({
        "schema_version": 1,
        "entries": {
            "task:2026-01-01T10:00:00Z": {
                "text": "write report",
                "completed": false,
                "createdAt": "2026-01-01T10:00:00Z"
            }
        }
    });
    std::fs::write(store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn read_entry(store_path: &PathBuf) -> serde_json::Value {
    let content = std::fs::read_to_string(store_path).expect("store file");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("store json");
    parsed["entries"]["task:2026-01-01T10:00:00Z"].clone()
}

#[test]
fn toggle_marks_task_done_and_persists() {
    let exe = env!("CARGO_BIN_EXE_taskpad");
    let store_path = temp_path("cli-toggle.json");
    seed_store(&store_path);

    let output = Command::new(exe)
        .args(["toggle", "1"])
        .env("TASKPAD_STORE_PATH", &store_path)
        .output()
        .expect("failed to run toggle command");

    let entry = read_entry(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Marked done: write report"));
    assert_eq!(entry["completed"], true);
    assert_eq!(entry["createdAt"], "2026-01-01T10:00:00Z");
}

#[test]
fn toggle_twice_restores_open_state() {
    let exe = env!("CARGO_BIN_EXE_taskpad");
    let store_path = temp_path("cli-toggle-twice.json");
    seed_store(&store_path);

    for _ in 0..2 {
        let output = Command::new(exe)
            .args(["toggle", "1"])
            .env("TASKPAD_STORE_PATH", &store_path)
            .output()
            .expect("failed to run toggle command");
        assert!(output.status.success());
    }

    let entry = read_entry(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert_eq!(entry["completed"], false);
}

#[test]
fn toggle_rejects_out_of_range_position() {
    let exe = env!("CARGO_BIN_EXE_taskpad");
    let store_path = temp_path("cli-toggle-range.json");
    seed_store(&store_path);

    let output = Command::new(exe)
        .args(["toggle", "5"])
        .env("TASKPAD_STORE_PATH", &store_path)
        .output()
        .expect("failed to run toggle command");

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn toggle_rejects_position_zero() {
    let exe = env!("CARGO_BIN_EXE_taskpad");
    let store_path = temp_path("cli-toggle-zero.json");
    seed_store(&store_path);

    let output = Command::new(exe)
        .args(["toggle", "0"])
        .env("TASKPAD_STORE_PATH", &store_path)
        .output()
        .expect("failed to run toggle command");

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("positions start at 1"));
}
