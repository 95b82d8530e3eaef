// Ports - Interface definitions (contracts)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::domain::errors::*;

/// Location and version of an external binary
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInfo {
    pub name: String,
    pub path: PathBuf,
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a media file and return the prober's full JSON report
    async fn probe(&self, file_path: &Path) -> Result<serde_json::Value, DomainError>;

    /// Fail with `InstallationRequired` when the prober is unavailable
    async fn check_available(&self) -> Result<ToolInfo, DomainError>;
}

/// Port for stream-copy execution
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Copy `[start_sec, start_sec + duration_sec)` of `source` into `output`
    async fn extract_range(
        &self,
        source: &Path,
        start_sec: f64,
        duration_sec: f64,
        output: &Path,
    ) -> Result<(), DomainError>;

    /// Concatenate the files listed in a concat manifest into `output`
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), DomainError>;

    /// Fail with `InstallationRequired` when the executor is unavailable
    async fn check_available(&self) -> Result<ToolInfo, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Get file size in bytes
    async fn get_file_size(&self, file_path: &Path) -> Result<u64, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Read a whole file as UTF-8
    async fn read_text(&self, file_path: &Path) -> Result<String, DomainError>;

    /// Write a whole file, creating parent directories
    async fn write_text(&self, file_path: &Path, contents: &str) -> Result<(), DomainError>;

    /// Create a uniquely named working directory that is removed when dropped
    async fn create_work_dir(&self, parent: &Path, prefix: &str) -> Result<TempDir, DomainError>;

    /// Resolve a path to an absolute one without requiring it to exist
    async fn absolute_path(&self, file_path: &Path) -> Result<PathBuf, DomainError>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log info message
    async fn info(&self, message: &str);

    /// Log warning message
    async fn warn(&self, message: &str);

    /// Log error message
    async fn error(&self, message: &str);

    /// Log debug message
    async fn debug(&self, message: &str);

    /// Log structured event
    async fn log_event(&self, event: &LogEvent);
}

/// Log event with structured data
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: std::time::SystemTime,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: std::time::SystemTime::now(),
            context: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::Input(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
