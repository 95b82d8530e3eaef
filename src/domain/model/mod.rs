// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::rules::{bytes_to_mb, BYTES_PER_MB};

/// Probed facts about a source file. All numeric fields are positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaMetadata {
    pub path: PathBuf,
    pub duration_sec: f64,
    pub size_bytes: f64,
    pub bitrate_bps: f64,
}

impl MediaMetadata {
    /// Create metadata with validation
    pub fn new(
        path: impl Into<PathBuf>,
        duration_sec: f64,
        size_bytes: f64,
        bitrate_bps: f64,
    ) -> Result<Self, DomainError> {
        for (name, value) in [
            ("duration", duration_sec),
            ("size", size_bytes),
            ("bit_rate", bitrate_bps),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DomainError::Metadata(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        Ok(Self {
            path: path.into(),
            duration_sec,
            size_bytes,
            bitrate_bps,
        })
    }

    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.size_bytes)
    }

    pub fn bitrate_kbps(&self) -> f64 {
        self.bitrate_bps / 1000.0
    }
}

/// How the split target is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Target is a size in GB (MB after conversion)
    BySize,
    /// Target is a duration in minutes
    ByDuration,
}

impl SplitMode {
    /// Parse split mode from string
    pub fn parse(mode_str: &str) -> Result<Self, DomainError> {
        match mode_str.trim().to_lowercase().as_str() {
            "by_size" | "by-size" | "size" => Ok(SplitMode::BySize),
            "by_duration" | "by-duration" | "duration" => Ok(SplitMode::ByDuration),
            _ => Err(DomainError::Input(format!(
                "Invalid split mode: {}. Valid modes: by_size, by_duration",
                mode_str
            ))),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMode::BySize => write!(f, "by_size"),
            SplitMode::ByDuration => write!(f, "by_duration"),
        }
    }
}

/// The computed decision of whether and how to split a source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitPlan {
    pub mode: SplitMode,
    /// Requested target before any upload cap (GB or minutes, per mode)
    pub target_value: f64,
    pub telegram_capped: bool,
    pub max_duration_sec: f64,
    pub duration_sec: f64,
    pub target_size_mb: f64,
    pub will_split: bool,
    pub estimated_parts: u32,
    pub input_path: PathBuf,
}

impl SplitPlan {
    /// Check the structural invariants of a plan
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        if (self.estimated_parts == 1) == self.will_split {
            return Err(DomainError::Input(format!(
                "Inconsistent plan: will_split={} with {} estimated parts",
                self.will_split, self.estimated_parts
            )));
        }
        if self.max_duration_sec <= 0.0 || self.max_duration_sec > self.duration_sec {
            return Err(DomainError::Input(format!(
                "Inconsistent plan: max duration {:.3}s outside (0, {:.3}]",
                self.max_duration_sec, self.duration_sec
            )));
        }
        Ok(())
    }
}

/// Persisted hand-off between the planning and the split/merge stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanArtifact {
    pub max_duration_sec: u64,
    pub duration_sec: u64,
    pub target_size_mb: f64,
    pub telegram_mode: bool,
    pub will_split: bool,
    pub estimated_parts: u32,
    pub input_video_path: String,
}

impl PlanArtifact {
    /// Convert a plan into its persisted form; seconds are truncated.
    pub fn from_plan(plan: &SplitPlan) -> Result<Self, DomainError> {
        let max_duration_sec = plan.max_duration_sec.trunc() as u64;
        if max_duration_sec == 0 {
            return Err(DomainError::Input(format!(
                "Target too small: each part could hold only {:.3}s of video",
                plan.max_duration_sec
            )));
        }

        Ok(Self {
            max_duration_sec,
            duration_sec: plan.duration_sec.trunc() as u64,
            target_size_mb: (plan.target_size_mb * 100.0).round() / 100.0,
            telegram_mode: plan.telegram_capped,
            will_split: plan.will_split,
            estimated_parts: plan.estimated_parts,
            input_video_path: plan.input_path.to_string_lossy().to_string(),
        })
    }
}

/// Everything the segment/merge stage needs to run
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    pub input_path: PathBuf,
    pub max_duration_sec: f64,
    pub total_duration_sec: f64,
    pub target_size_mb: f64,
    pub will_split: bool,
    pub estimated_parts: u32,
}

impl ExecutionPlan {
    /// Create a new execution plan with validation
    pub fn new(
        input_path: impl Into<PathBuf>,
        max_duration_sec: f64,
        total_duration_sec: f64,
        target_size_mb: f64,
    ) -> Result<Self, DomainError> {
        let input_path = input_path.into();
        if input_path.as_os_str().is_empty() {
            return Err(DomainError::Input("Plan has no input video path".to_string()));
        }
        if !(max_duration_sec > 0.0) || !(total_duration_sec > 0.0) {
            return Err(DomainError::Input(format!(
                "Plan durations must be positive (max {}, total {})",
                max_duration_sec, total_duration_sec
            )));
        }
        if !(target_size_mb > 0.0) {
            return Err(DomainError::Input(format!(
                "Plan target size must be positive, got {}",
                target_size_mb
            )));
        }

        let max_duration_sec = max_duration_sec.min(total_duration_sec);
        let estimated_parts = (total_duration_sec / max_duration_sec).ceil() as u32;

        Ok(Self {
            input_path,
            max_duration_sec,
            total_duration_sec,
            target_size_mb,
            will_split: estimated_parts > 1,
            estimated_parts: estimated_parts.max(1),
        })
    }

    /// Build from an in-memory plan, keeping fractional seconds
    pub fn from_split_plan(plan: &SplitPlan) -> Result<Self, DomainError> {
        Self::new(
            plan.input_path.clone(),
            plan.max_duration_sec,
            plan.duration_sec,
            plan.target_size_mb,
        )
    }

    /// Build from a persisted plan artifact
    pub fn from_artifact(artifact: &PlanArtifact) -> Result<Self, DomainError> {
        Self::new(
            PathBuf::from(&artifact.input_video_path),
            artifact.max_duration_sec as f64,
            artifact.duration_sec as f64,
            artifact.target_size_mb,
        )
    }

    /// Replace the planned duration with the source's measured one.
    ///
    /// Plan artifacts keep whole seconds, so the fractional tail of the
    /// source would otherwise never be extracted. A plan that did not split
    /// keeps a single window over the whole source.
    pub fn with_measured_duration(self, duration_sec: f64) -> Result<Self, DomainError> {
        let max_duration_sec = if self.will_split {
            self.max_duration_sec
        } else {
            duration_sec
        };
        Self::new(self.input_path, max_duration_sec, duration_sec, self.target_size_mb)
    }
}

/// A contiguous, stream-copied time segment of the source
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub index: usize,
    pub path: PathBuf,
    pub start_offset_sec: f64,
    pub duration_sec: f64,
    pub size_bytes: f64,
}

impl Chunk {
    pub fn end_offset_sec(&self) -> f64 {
        self.start_offset_sec + self.duration_sec
    }

    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.size_bytes)
    }
}

/// Ordered, non-empty run of consecutive chunks
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    chunks: Vec<Chunk>,
    cumulative_size_bytes: f64,
}

impl Group {
    /// Start a group with its first chunk
    pub fn new(first: Chunk) -> Self {
        let cumulative_size_bytes = first.size_bytes;
        Self {
            chunks: vec![first],
            cumulative_size_bytes,
        }
    }

    pub fn push(&mut self, chunk: Chunk) {
        self.cumulative_size_bytes += chunk.size_bytes;
        self.chunks.push(chunk);
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn cumulative_size_mb(&self) -> f64 {
        self.cumulative_size_bytes / BYTES_PER_MB
    }

    pub fn start_offset_sec(&self) -> f64 {
        self.chunks[0].start_offset_sec
    }

    pub fn duration_sec(&self) -> f64 {
        self.chunks.iter().map(|c| c.duration_sec).sum()
    }
}

/// Final merged output produced from one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    /// 1-based, in group order
    pub index: usize,
    pub path: PathBuf,
    pub size_bytes: f64,
    pub start_offset_sec: f64,
    pub duration_sec: f64,
    pub chunk_count: usize,
}

impl Part {
    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.size_bytes)
    }

    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Pipeline run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    MetadataProbed,
    Planned,
    Segmented,
    Grouped,
    Merged,
    Cleaned,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Cleaned | RunState::Failed)
    }

    /// The single forward successor of this state
    pub fn successor(&self) -> Option<RunState> {
        match self {
            RunState::Idle => Some(RunState::MetadataProbed),
            RunState::MetadataProbed => Some(RunState::Planned),
            RunState::Planned => Some(RunState::Segmented),
            RunState::Segmented => Some(RunState::Grouped),
            RunState::Grouped => Some(RunState::Merged),
            RunState::Merged => Some(RunState::Cleaned),
            RunState::Cleaned | RunState::Failed => None,
        }
    }

    pub fn can_transition_to(&self, next: RunState) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == RunState::Failed || self.successor() == Some(next)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Pipeline stage used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Preflight,
    Probe,
    Plan,
    Segment,
    Group,
    Merge,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Preflight => "preflight",
            Stage::Probe => "probe",
            Stage::Plan => "plan",
            Stage::Segment => "segment",
            Stage::Group => "group",
            Stage::Merge => "merge",
            Stage::Cleanup => "cleanup",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a successful pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub parts: Vec<Part>,
    pub chunk_count: usize,
    pub final_state: RunState,
    pub history: Vec<RunState>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn part_paths(&self) -> Vec<PathBuf> {
        self.parts.iter().map(|p| p.path.clone()).collect()
    }
}

#[cfg(test)]
mod tests;
