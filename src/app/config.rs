//! Application configuration values
//!
//! Configuration is an explicit value handed to the container and the
//! orchestrator; nothing here is process-global.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::engine::progress::ProgressMode;
use crate::ports::LogLevel;
use crate::utils::logging::LogFormat;

/// Prefix of per-run working directories
pub const WORK_DIR_PREFIX: &str = "splitmerge-";

/// Application configuration, as read from `[splitmerge]` in a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// ffmpeg binary name or path
    pub ffmpeg: String,
    /// ffprobe binary name or path
    pub ffprobe: String,
    /// Where metadata artifacts are written
    pub metadata_dir: PathBuf,
    /// Where parts are written; defaults to `<source dir>/output`
    pub output_dir: Option<PathBuf>,
    /// Parent of the per-run working directory; defaults to the source dir
    pub work_dir: Option<PathBuf>,
    /// Per-invocation timeout for external tools; unset waits forever
    pub tool_timeout_secs: Option<u64>,
    pub log_level: String,
    pub log_format: String,
    pub progress: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            metadata_dir: PathBuf::from("metadata"),
            output_dir: None,
            work_dir: None,
            tool_timeout_secs: None,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            progress: "log".to_string(),
        }
    }
}

impl AppConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        LogLevel::parse(&self.log_level)?;
        LogFormat::parse(&self.log_format)?;
        ProgressMode::parse(&self.progress)?;

        if self.ffmpeg.trim().is_empty() {
            return Err(DomainError::Input("ffmpeg binary cannot be empty".to_string()));
        }
        if self.ffprobe.trim().is_empty() {
            return Err(DomainError::Input("ffprobe binary cannot be empty".to_string()));
        }
        if self.metadata_dir.as_os_str().is_empty() {
            return Err(DomainError::Input("metadata_dir cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Settings the split/merge orchestrator needs
    pub fn pipeline_config(&self) -> Result<PipelineConfig, DomainError> {
        Ok(PipelineConfig {
            output_dir: self.output_dir.clone(),
            work_root: self.work_dir.clone(),
            work_dir_prefix: WORK_DIR_PREFIX.to_string(),
            progress: ProgressMode::parse(&self.progress)?,
        })
    }
}

/// Explicit configuration passed to the orchestrator constructor
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub output_dir: Option<PathBuf>,
    pub work_root: Option<PathBuf>,
    pub work_dir_prefix: String,
    pub progress: ProgressMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            work_root: None,
            work_dir_prefix: WORK_DIR_PREFIX.to_string(),
            progress: ProgressMode::Log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        let pipeline = config.pipeline_config().unwrap();
        assert_eq!(pipeline.progress, ProgressMode::Log);
        assert_eq!(pipeline.work_dir_prefix, WORK_DIR_PREFIX);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.progress = "bars".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.ffmpeg = " ".to_string();
        assert!(config.validate().is_err());
    }
}
