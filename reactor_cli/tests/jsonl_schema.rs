use assert_cmd::prelude::*;
use rstest::rstest;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const CONFIG: &str = r#"
[runner]
tick_hz = 1000

[[sensor]]
name = "pct"
channel = 3
preset = "pot_for_percentage"
smoothing = 1
zones = [{ id = 0, min = 0, max = 49 }, { id = 1, min = 50, max = 100 }]
"#;

fn run_json(trace: &str) -> Vec<serde_json::Value> {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, CONFIG).unwrap();
    let csv = dir.path().join("trace.csv");
    fs::write(&csv, trace).unwrap();

    let out = Command::cargo_bin("reactor")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .args(["run", "--trace"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8(out.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("every stdout line is JSON"))
        .collect()
}

#[rstest]
// 0..1023 -> 0..100; 512 -> 50, 1023 -> 100, 0 -> 0
#[case("raw\n512\n1023\n0\n", &[("change", 100), ("change", 0)])]
// 520 -> 50 holds: 50 stays on the grid
#[case("raw\n512\n520\n", &[])]
fn events_match_schema(#[case] trace: &str, #[case] expected: &[(&str, i64)]) {
    let lines = run_json(trace);
    let (summary, events) = lines.split_last().unwrap();

    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["sensors"][0]["sensor"], "pct");
    assert_eq!(summary["sensors"][0]["channel"], 3);

    let changes: Vec<(&str, i64)> = events
        .iter()
        .filter(|e| e["event"] == "change")
        .map(|e| ("change", e["value"].as_i64().unwrap()))
        .collect();
    assert_eq!(changes, expected);

    for e in events {
        assert!(e["tick"].is_u64());
        assert_eq!(e["sensor"], "pct");
        if e["event"] == "zone" {
            assert!(e["zone"].is_u64() || e["zone"].is_null());
            assert!(e.get("from").is_some());
        }
    }
}

#[test]
fn json_errors_are_structured() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, "[runner]\ntick_hz = 0\n").unwrap();
    let out = Command::cargo_bin("reactor")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("check")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8(out.stderr).unwrap();
    let last = stderr.lines().last().unwrap();
    let v: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(v["reason"], "Error");
    assert_eq!(v["exit_code"], 3);
    assert!(v["message"].as_str().unwrap().contains("tick_hz must be > 0"));
}
