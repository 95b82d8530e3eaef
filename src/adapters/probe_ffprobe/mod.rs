//! FFprobe adapter for media file probing
//!
//! Shells out to the `ffprobe` binary and returns its JSON report untouched.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::tool_process::{stderr_text, ToolProcess};
use crate::domain::errors::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    tool: ToolProcess,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(binary: impl Into<String>, timeout_secs: Option<u64>) -> Self {
        Self {
            tool: ToolProcess::new(binary).with_timeout(timeout_secs),
        }
    }

    fn probe_args(file_path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            "-show_streams".to_string(),
            file_path.to_string_lossy().to_string(),
        ]
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new("ffprobe", None)
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe(&self, file_path: &Path) -> Result<serde_json::Value, DomainError> {
        if !file_path.exists() {
            return Err(DomainError::NotFound(file_path.to_path_buf()));
        }

        let output = self.tool.run(Self::probe_args(file_path)).await?;
        if !output.status.success() {
            return Err(DomainError::probe(
                format!(
                    "{} exited with status {}",
                    self.tool.tool_name(),
                    output.status
                ),
                stderr_text(&output),
            ));
        }

        debug!("{} returned {} bytes", self.tool.tool_name(), output.stdout.len());

        serde_json::from_slice(&output.stdout).map_err(|e| {
            DomainError::probe(format!("unparseable prober output: {}", e), stderr_text(&output))
        })
    }

    async fn check_available(&self) -> Result<ToolInfo, DomainError> {
        self.tool.locate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_args_request_format_and_streams() {
        let args = FFprobeAdapter::probe_args(Path::new("/videos/a b.mp4"));
        assert_eq!(args.last().map(String::as_str), Some("/videos/a b.mp4"));
        assert!(args.iter().any(|a| a == "-show_format"));
        assert!(args.iter().any(|a| a == "-show_streams"));
        assert!(args.windows(2).any(|w| w[0] == "-print_format" && w[1] == "json"));
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let adapter = FFprobeAdapter::default();
        let result = adapter.probe(Path::new("/definitely/not/here.mp4")).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
