// Unit tests for domain models

use super::*;

fn chunk(index: usize, start: f64, duration: f64, size_mb: f64) -> Chunk {
    Chunk {
        index,
        path: PathBuf::from(format!("/tmp/work/clip_chunk_{:03}.mp4", index)),
        start_offset_sec: start,
        duration_sec: duration,
        size_bytes: size_mb * BYTES_PER_MB,
    }
}

fn plan(max: f64, duration: f64, will_split: bool, parts: u32) -> SplitPlan {
    SplitPlan {
        mode: SplitMode::BySize,
        target_value: 1.0,
        telegram_capped: false,
        max_duration_sec: max,
        duration_sec: duration,
        target_size_mb: 1024.0,
        will_split,
        estimated_parts: parts,
        input_path: PathBuf::from("/videos/clip.mp4"),
    }
}

#[test]
fn test_media_metadata_creation() {
    let meta = MediaMetadata::new("/videos/clip.mp4", 650.0, 170_393_600.0, 2_000_000.0).unwrap();
    assert_eq!(meta.size_mb(), 162.5);
    assert_eq!(meta.bitrate_kbps(), 2000.0);
}

#[test]
fn test_media_metadata_rejects_non_positive_fields() {
    assert!(MediaMetadata::new("a.mp4", 0.0, 1.0, 1.0).is_err());
    assert!(MediaMetadata::new("a.mp4", 1.0, -1.0, 1.0).is_err());
    assert!(matches!(
        MediaMetadata::new("a.mp4", 1.0, 1.0, f64::NAN),
        Err(DomainError::Metadata(_))
    ));
}

#[test]
fn test_split_mode_parsing() {
    assert_eq!(SplitMode::parse("by_size").unwrap(), SplitMode::BySize);
    assert_eq!(SplitMode::parse("BY-SIZE").unwrap(), SplitMode::BySize);
    assert_eq!(SplitMode::parse("duration").unwrap(), SplitMode::ByDuration);
    assert_eq!(SplitMode::parse("by_duration").unwrap(), SplitMode::ByDuration);
    assert!(SplitMode::parse("by_frames").is_err());
    assert_eq!(SplitMode::ByDuration.to_string(), "by_duration");
}

#[test]
fn test_split_plan_invariants() {
    assert!(plan(409.6, 650.0, true, 2).check_invariants().is_ok());
    assert!(plan(650.0, 650.0, false, 1).check_invariants().is_ok());
    assert!(plan(650.0, 650.0, true, 1).check_invariants().is_err());
    assert!(plan(300.0, 650.0, false, 3).check_invariants().is_err());
    assert!(plan(700.0, 650.0, false, 1).check_invariants().is_err());
}

#[test]
fn test_plan_artifact_truncates_seconds() {
    let mut p = plan(409.6, 650.7, true, 2);
    p.target_size_mb = 99.996;
    let artifact = PlanArtifact::from_plan(&p).unwrap();
    assert_eq!(artifact.max_duration_sec, 409);
    assert_eq!(artifact.duration_sec, 650);
    assert_eq!(artifact.target_size_mb, 100.0);
    assert_eq!(artifact.estimated_parts, 2);
    assert_eq!(artifact.input_video_path, "/videos/clip.mp4");
}

#[test]
fn test_plan_artifact_rejects_sub_second_parts() {
    let p = plan(0.4, 650.0, true, 1625);
    assert!(matches!(PlanArtifact::from_plan(&p), Err(DomainError::Input(_))));
}

#[test]
fn test_plan_artifact_json_shape() {
    let artifact = PlanArtifact::from_plan(&plan(409.6, 650.0, true, 2)).unwrap();
    let value = serde_json::to_value(&artifact).unwrap();
    assert_eq!(value["max_duration_sec"], 409);
    assert_eq!(value["duration_sec"], 650);
    assert_eq!(value["telegram_mode"], false);
    assert_eq!(value["will_split"], true);
    assert_eq!(value["input_video_path"], "/videos/clip.mp4");
}

#[test]
fn test_execution_plan_from_artifact() {
    let artifact = PlanArtifact {
        max_duration_sec: 409,
        duration_sec: 650,
        target_size_mb: 100.0,
        telegram_mode: false,
        will_split: true,
        estimated_parts: 2,
        input_video_path: "/videos/clip.mp4".to_string(),
    };
    let exec = ExecutionPlan::from_artifact(&artifact).unwrap();
    assert_eq!(exec.max_duration_sec, 409.0);
    assert_eq!(exec.total_duration_sec, 650.0);
    assert_eq!(exec.estimated_parts, 2);
    assert!(exec.will_split);
}

#[test]
fn test_measured_duration_restores_truncated_tail() {
    let split = ExecutionPlan::new("/videos/clip.mp4", 409.0, 650.0, 100.0)
        .unwrap()
        .with_measured_duration(650.9)
        .unwrap();
    assert_eq!(split.max_duration_sec, 409.0);
    assert_eq!(split.total_duration_sec, 650.9);
    assert_eq!(split.estimated_parts, 2);

    let whole = ExecutionPlan::new("/videos/clip.mp4", 650.0, 650.0, 160.0)
        .unwrap()
        .with_measured_duration(650.9)
        .unwrap();
    assert_eq!(whole.max_duration_sec, 650.9);
    assert_eq!(whole.estimated_parts, 1);
    assert!(!whole.will_split);
}

#[test]
fn test_execution_plan_validation() {
    assert!(ExecutionPlan::new("", 10.0, 20.0, 1.0).is_err());
    assert!(ExecutionPlan::new("a.mp4", 0.0, 20.0, 1.0).is_err());
    assert!(ExecutionPlan::new("a.mp4", 10.0, 0.0, 1.0).is_err());
    assert!(ExecutionPlan::new("a.mp4", 10.0, 20.0, 0.0).is_err());

    let clamped = ExecutionPlan::new("a.mp4", 300.0, 200.0, 1.0).unwrap();
    assert_eq!(clamped.max_duration_sec, 200.0);
    assert!(!clamped.will_split);
    assert_eq!(clamped.estimated_parts, 1);
}

#[test]
fn test_group_accumulates_size() {
    let mut group = Group::new(chunk(0, 0.0, 10.0, 40.0));
    group.push(chunk(1, 10.0, 10.0, 5.0));
    assert_eq!(group.len(), 2);
    assert_eq!(group.cumulative_size_mb(), 45.0);
    assert_eq!(group.start_offset_sec(), 0.0);
    assert_eq!(group.duration_sec(), 20.0);
    assert_eq!(group.into_chunks().len(), 2);
}

#[test]
fn test_chunk_end_offset() {
    let c = chunk(2, 20.0, 7.5, 1.0);
    assert_eq!(c.end_offset_sec(), 27.5);
}

#[test]
fn test_run_state_transitions() {
    assert!(RunState::Idle.can_transition_to(RunState::MetadataProbed));
    assert!(RunState::Planned.can_transition_to(RunState::Segmented));
    assert!(RunState::Merged.can_transition_to(RunState::Cleaned));
    assert!(RunState::Segmented.can_transition_to(RunState::Failed));
    assert!(!RunState::Idle.can_transition_to(RunState::Segmented));
    assert!(!RunState::Cleaned.can_transition_to(RunState::Failed));
    assert!(!RunState::Failed.can_transition_to(RunState::Cleaned));
    assert!(RunState::Failed.is_terminal());
}

#[test]
fn test_stage_display() {
    assert_eq!(Stage::Segment.to_string(), "segment");
    assert_eq!(Stage::Merge.to_string(), "merge");
}
