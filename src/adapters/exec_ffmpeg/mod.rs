//! FFmpeg execution adapter
//!
//! Stream-copy range extraction and concat-demuxer joins via the `ffmpeg` CLI.

use std::path::Path;

use async_trait::async_trait;

use crate::adapters::tool_process::{stderr_text, ToolProcess};
use crate::domain::errors::*;
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    tool: ToolProcess,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(binary: impl Into<String>, timeout_secs: Option<u64>) -> Self {
        Self {
            tool: ToolProcess::new(binary).with_timeout(timeout_secs),
        }
    }

    fn extract_args(source: &Path, start_sec: f64, duration_sec: f64, output: &Path) -> Vec<String> {
        let (start, length) = millisecond_window(start_sec, duration_sec);
        vec![
            "-y".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-i".to_string(),
            source.to_string_lossy().to_string(),
            "-ss".to_string(),
            start,
            "-t".to_string(),
            length,
            "-map".to_string(),
            "0".to_string(),
            "-c".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    fn concat_args(manifest: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            manifest.to_string_lossy().to_string(),
            "-map".to_string(),
            "0".to_string(),
            "-c".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    async fn run_checked(&self, args: Vec<String>, what: &str) -> Result<(), DomainError> {
        let output = self.tool.run(args).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(DomainError::external_tool(
                self.tool.tool_name(),
                format!("{} exited with status {}", what, output.status),
                output.status.code(),
                stderr_text(&output),
            ))
        }
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new("ffmpeg", None)
    }
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    async fn extract_range(
        &self,
        source: &Path,
        start_sec: f64,
        duration_sec: f64,
        output: &Path,
    ) -> Result<(), DomainError> {
        let args = Self::extract_args(source, start_sec, duration_sec, output);
        self.run_checked(args, &format!("extraction at {:.3}s", start_sec))
            .await
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), DomainError> {
        self.run_checked(Self::concat_args(manifest, output), "concatenation")
            .await
    }

    async fn check_available(&self) -> Result<ToolInfo, DomainError> {
        self.tool.locate()
    }
}

/// Render `-ss` and `-t` in milliseconds.
///
/// Both ends are rounded and the length is their difference, so adjacent
/// windows share a boundary instead of drifting apart by a millisecond.
fn millisecond_window(start_sec: f64, duration_sec: f64) -> (String, String) {
    let start_ms = (start_sec * 1000.0).round() as u64;
    let end_ms = ((start_sec + duration_sec) * 1000.0).round() as u64;
    (
        format_millis(start_ms),
        format_millis(end_ms.saturating_sub(start_ms)),
    )
}

fn format_millis(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_args_are_stream_copy() {
        let args = FFmpegAdapter::extract_args(
            Path::new("/in/video.mp4"),
            409.6,
            240.4,
            Path::new("/tmp/video_chunk_001.mp4"),
        );
        assert!(args.windows(2).any(|w| w[0] == "-ss" && w[1] == "409.600"));
        assert!(args.windows(2).any(|w| w[0] == "-t" && w[1] == "240.400"));
        assert!(args.windows(2).any(|w| w[0] == "-c" && w[1] == "copy"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/video_chunk_001.mp4"));
    }

    #[test]
    fn test_rounded_windows_stay_contiguous() {
        let millis = |text: &str| (text.parse::<f64>().unwrap() * 1000.0).round() as u64;
        let windows = crate::planner::chunk_windows(1.0004, 5.0).unwrap();

        let rendered: Vec<(u64, u64)> = windows
            .iter()
            .map(|w| {
                let (start, length) = millisecond_window(w.start_sec, w.duration_sec);
                (millis(&start), millis(&length))
            })
            .collect();
        for pair in rendered.windows(2) {
            assert_eq!(pair[0].0 + pair[0].1, pair[1].0);
        }
        let (start, length) = rendered[rendered.len() - 1];
        assert_eq!(start + length, 5000);
    }

    #[test]
    fn test_concat_args_use_demuxer() {
        let args = FFmpegAdapter::concat_args(Path::new("/tmp/merge_list.txt"), Path::new("/out/p.mp4"));
        assert!(args.windows(2).any(|w| w[0] == "-f" && w[1] == "concat"));
        assert!(args.windows(2).any(|w| w[0] == "-safe" && w[1] == "0"));
        assert!(args.windows(2).any(|w| w[0] == "-i" && w[1] == "/tmp/merge_list.txt"));
    }
}
