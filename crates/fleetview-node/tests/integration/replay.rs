//! End-to-end replay tests

use serde_json::{json, Value};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_fleetview-node");

// Roughly one meter of longitude at the equator, in degrees
const METER: f64 = 1.0 / 111_195.0;

/// Run the binary with `feed` on stdin and parse every stdout line
async fn replay(feed: &[Value], extra_args: &[&str]) -> Vec<Value> {
    let mut child = Command::new(BIN)
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn fleetview-node");

    let mut stdin = child.stdin.take().unwrap();
    let input: String = feed.iter().map(|v| format!("{}\n", v)).collect();
    stdin.write_all(input.as_bytes()).await.unwrap();
    drop(stdin);

    let output = child.wait_with_output().await.unwrap();
    assert!(output.status.success(), "fleetview-node exited with {}", output.status);

    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn position(device: i64, east_m: f64, fix_time: i64) -> Value {
    json!({
        "type": "position",
        "device_id": device,
        "latitude": 0.0,
        "longitude": east_m * METER,
        "fix_time": fix_time
    })
}

#[tokio::test]
async fn test_eastbound_device_gets_heading() {
    let feed = vec![
        json!({"type": "refresh", "devices": [{"id": 1, "name": "Van 1"}]}),
        position(1, 0.0, 1_000),
        position(1, 25.0, 2_000),
        position(1, 50.0, 3_000),
    ];

    let changes = replay(&feed, &[]).await;
    let headings: Vec<&Value> = changes.iter().filter(|c| c["type"] == "heading").collect();

    assert_eq!(headings.len(), 3);
    assert_eq!(headings[0]["status"], "loading");
    assert_eq!(headings[1]["status"], "ready");
    assert_eq!(headings[1]["updated"], true);

    let displayed = headings[2]["displayed"].as_f64().unwrap();
    assert!((displayed - 90.0).abs() < 0.01, "displayed {}", displayed);
}

#[tokio::test]
async fn test_stationary_device_stays_unavailable() {
    let feed = vec![
        json!({"type": "refresh", "devices": [{"id": 7}]}),
        position(7, 0.0, 1_000),
        position(7, 0.4, 2_000),
        position(7, 0.1, 3_000),
    ];

    let changes = replay(&feed, &[]).await;
    let last = changes.iter().rev().find(|c| c["type"] == "heading").unwrap();

    assert_eq!(last["status"], "unavailable");
    assert!(last["displayed"].is_null());
}

#[tokio::test]
async fn test_follow_cleared_when_device_dropped() {
    let feed = vec![
        json!({"type": "refresh", "devices": [{"id": 1}, {"id": 2}]}),
        json!({"type": "follow", "id": 1}),
        json!({"type": "refresh", "devices": [{"id": 2}]}),
    ];

    let changes = replay(&feed, &[]).await;
    let directory: Vec<&Value> = changes.iter().filter(|c| c["type"] == "directory").collect();

    assert_eq!(directory.len(), 3);
    assert_eq!(directory[1]["follow_device_id"], "1");
    assert!(directory[2]["follow_device_id"].is_null());
    assert_eq!(directory[2]["devices"], 1);
}

#[tokio::test]
async fn test_camera_follows_device() {
    let feed = vec![
        json!({"type": "refresh", "devices": [{"id": 3}]}),
        json!({"type": "follow", "id": 3}),
        position(3, 0.0, 1_000),
        position(3, 40.0, 2_000),
    ];

    let changes = replay(&feed, &[]).await;
    let camera = changes.iter().rev().find(|c| c["type"] == "camera").unwrap();

    assert_eq!(camera["device_id"], "3");
    let rotation = camera["rotation"].as_f64().unwrap();
    assert!((rotation - 90.0).abs() < 0.01);
}

#[tokio::test]
async fn test_mixed_id_kinds_accepted() {
    let feed = vec![
        json!({"type": "refresh", "devices": [{"id": "abc"}, {"id": 2}]}),
        json!({"type": "follow", "id": "abc"}),
    ];

    let changes = replay(&feed, &[]).await;

    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0]["type"], "directory");
    assert_eq!(changes[0]["devices"], 2);
    assert_eq!(changes[1]["follow_device_id"], "abc");
}

#[tokio::test]
async fn test_camera_moves_after_untimed_select() {
    let mut feed = vec![
        json!({"type": "refresh", "devices": [{"id": 1}]}),
        json!({"type": "follow", "id": 1}),
        json!({"type": "select", "id": 1}),
    ];
    for i in 0..20 {
        feed.push(position(1, 33.0 * i as f64, 10_000 + 1_000 * i));
    }

    let changes = replay(&feed, &[]).await;
    let moves = changes.iter().filter(|c| c["type"] == "camera").count();

    assert!(moves > 1, "camera moved {} times", moves);
}

#[tokio::test]
async fn test_malformed_line_does_not_stop_replay() {
    let mut child = Command::new(BIN)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(b"not json\n{\"type\":\"refresh\",\"devices\":[{\"id\":1}]}\n")
        .await
        .unwrap();
    drop(stdin);

    let output = child.wait_with_output().await.unwrap();
    assert!(output.status.success());

    let changes: Vec<Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0]["type"], "error");
    assert_eq!(changes[0]["line"], 1);
    assert_eq!(changes[1]["type"], "directory");
}

#[tokio::test]
async fn test_print_config() {
    let output = Command::new(BIN)
        .arg("--print-config")
        .stderr(Stdio::null())
        .output()
        .await
        .unwrap();
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["heading"]["max_bearings"], 3);
    assert_eq!(config["heading"]["max_heading_hold"], "5s");
    assert_eq!(config["camera"]["selection_settle"], "1s 500ms");
}
