use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn fixture_thread() -> String {
    serde_json::json!([
        {
            "message_id": "u1",
            "type": "user",
            "content": "run the script",
            "created_at": "2025-11-12T18:31:18.000Z"
        },
        {
            "message_id": "a1",
            "type": "assistant",
            "content": "Running it now. <execute-command>python hello.py</execute-command>",
            "created_at": "2025-11-12T18:31:19.000Z"
        },
        {
            "message_id": "t1",
            "type": "tool",
            "content": {"tool_execution": {
                "function_name": "execute_command",
                "result": {"success": true, "output": {"output": "hello", "exit_code": 0}}
            }},
            "created_at": "2025-11-12T18:31:21.000Z"
        }
    ])
    .to_string()
}

#[test]
fn render_prints_one_block_per_tool_call() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("thread.json");
    fs::write(&path, fixture_thread()).unwrap();

    Command::cargo_bin("suna-views")
        .unwrap()
        .arg("render")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Execute Command"))
        .stdout(predicate::str::contains("hello"));
}

#[test]
fn render_survives_a_failing_tool_with_exit_zero() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("thread.json");
    let thread = serde_json::json!([
        {
            "message_id": "a1",
            "type": "assistant",
            "content": "Trying. <execute-command>false</execute-command>"
        },
        {
            "message_id": "t1",
            "type": "tool",
            "content": {"tool_execution": {
                "function_name": "execute_command",
                "result": {"success": false, "error": "exit status 1"}
            }}
        }
    ]);
    fs::write(&path, thread.to_string()).unwrap();

    Command::cargo_bin("suna-views")
        .unwrap()
        .arg("render")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("exit status 1"));
}

#[test]
fn extract_emits_machine_readable_json() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("thread.json");
    fs::write(&path, fixture_thread()).unwrap();

    let output = Command::cargo_bin("suna-views")
        .unwrap()
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    let items = parsed.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].get("tool").and_then(|v| v.as_str()),
        Some("execute-command")
    );
    assert_eq!(
        items[0]
            .pointer("/resolved/state")
            .and_then(|v| v.as_str()),
        Some("success")
    );
}

#[test]
fn missing_file_is_a_cli_error() {
    Command::cargo_bin("suna-views")
        .unwrap()
        .arg("render")
        .arg("/no/such/thread.json")
        .assert()
        .failure();
}

#[test]
fn invalid_tuning_file_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let thread = dir.path().join("thread.json");
    fs::write(&thread, fixture_thread()).unwrap();
    let tuning = dir.path().join("tuning.toml");
    fs::write(&tuning, "correlation_window_ms = \"soon\"").unwrap();

    Command::cargo_bin("suna-views")
        .unwrap()
        .arg("render")
        .arg(&thread)
        .arg("--config")
        .arg(&tuning)
        .assert()
        .failure();
}
