//! SplitMerge video splitter library
//!
//! Probes a video with ffprobe, plans how long each piece may be so that
//! parts stay under a size or duration target, cuts the video into chunks
//! with ffmpeg stream copy, regroups consecutive chunks under the size
//! target and concatenates each group into a final part.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use app::{AppConfig, DefaultAppContainer, PipelineConfig, SplitMergeInteractor};
pub use domain::errors::{DomainError, ErrorKind};
pub use domain::model::{
    Chunk, ExecutionPlan, Group, MediaMetadata, Part, PlanArtifact, RunReport, RunState,
    SplitMode, SplitPlan, Stage,
};
pub use error::{SplitMergeError, SplitMergeResult};
