use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;

fn splitmerge(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("splitmerge").unwrap();
    cmd.current_dir(cwd)
        .env_remove("SPLITMERGE_CONFIG")
        .env_remove("RUST_LOG")
        .args(["--log-level", "warn"]);
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Metadata artifact for a 650 s, 162.5 MB, 2000 kbps source that exists on disk
fn write_metadata(dir: &TempDir) -> PathBuf {
    let video = dir.path().join("lecture.mp4");
    std::fs::write(&video, b"video").unwrap();

    let metadata = json!({
        "format": {
            "filename": video.to_string_lossy(),
            "duration": "650.000000",
            "size": "170393600",
            "bit_rate": "2000000"
        },
        "streams": [],
        "input_video_path": video.to_string_lossy()
    });
    let path = dir.path().join("metadata").join("lecture.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_string_pretty(&metadata).unwrap()).unwrap();
    path
}

#[test]
fn test_compute_plan_writes_artifact() {
    let dir = TempDir::new().unwrap();
    let metadata = write_metadata(&dir);
    let plan_path = dir.path().join("plan.json");

    let output = splitmerge(dir.path())
        .arg("compute-plan")
        .arg("--metadata")
        .arg(&metadata)
        .args(["--mode", "by_size", "--target", "0.09765625", "--output"])
        .arg(&plan_path)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("Estimated parts: 2"));
    assert!(text.contains("10 m 50 s"));

    let plan: Value = serde_json::from_str(&std::fs::read_to_string(&plan_path).unwrap()).unwrap();
    assert_eq!(plan["max_duration_sec"], 409);
    assert_eq!(plan["duration_sec"], 650);
    assert_eq!(plan["target_size_mb"], 100.0);
    assert_eq!(plan["telegram_mode"], false);
    assert_eq!(plan["will_split"], true);
    assert_eq!(plan["estimated_parts"], 2);
}

#[test]
fn test_compute_plan_default_path_and_json_summary() {
    let dir = TempDir::new().unwrap();
    let metadata = write_metadata(&dir);

    let output = splitmerge(dir.path())
        .arg("compute-plan")
        .arg("--metadata")
        .arg(&metadata)
        .args(["--mode", "by_duration", "--target", "5", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let summary: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(summary["max_duration_sec"], 300);
    assert_eq!(summary["estimated_parts"], 3);
    assert!(dir.path().join("metadata").join("lecture_plan.json").exists());
}

#[test]
fn test_compute_plan_rejects_zero_target() {
    let dir = TempDir::new().unwrap();
    let metadata = write_metadata(&dir);

    let output = splitmerge(dir.path())
        .arg("compute-plan")
        .arg("--metadata")
        .arg(&metadata)
        .args(["--target", "0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("greater than 0"));
    assert!(!dir.path().join("metadata").join("lecture_plan.json").exists());
}

#[test]
fn test_compute_plan_missing_video_fails() {
    let dir = TempDir::new().unwrap();
    let metadata = write_metadata(&dir);
    std::fs::remove_file(dir.path().join("lecture.mp4")).unwrap();

    let output = splitmerge(dir.path())
        .arg("compute-plan")
        .arg("--metadata")
        .arg(&metadata)
        .args(["--target", "1"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("File not found"));
}

#[test]
fn test_split_and_merge_missing_plan_fails() {
    let dir = TempDir::new().unwrap();

    splitmerge(dir.path())
        .args(["split-and-merge", "--plan", "nope.json"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_mode_and_bad_config_fail() {
    let dir = TempDir::new().unwrap();
    let metadata = write_metadata(&dir);

    splitmerge(dir.path())
        .arg("compute-plan")
        .arg("--metadata")
        .arg(&metadata)
        .args(["--mode", "by_weight", "--target", "1"])
        .assert()
        .failure();

    std::fs::write(dir.path().join("bad.toml"), "[splitmerge]\nprogress = \"bars\"\n").unwrap();
    splitmerge(dir.path())
        .args(["--config", "bad.toml", "check-tools"])
        .assert()
        .failure();
}
