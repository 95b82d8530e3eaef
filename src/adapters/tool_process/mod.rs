//! Blocking-style runner for external command-line tools
//!
//! Every invocation is awaited to completion before the next one starts. The
//! child is killed if the awaiting future is dropped (e.g. on Ctrl-C).

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::ports::ToolInfo;

/// Runner for a single external binary
#[derive(Debug, Clone)]
pub struct ToolProcess {
    binary: String,
    timeout_secs: Option<u64>,
}

impl ToolProcess {
    /// Create a runner for `binary` (a name looked up in PATH, or a path)
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout_secs: None,
        }
    }

    /// Set timeout; `None` or zero waits indefinitely
    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs.filter(|secs| *secs > 0);
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Short tool name used in error messages
    pub fn tool_name(&self) -> String {
        Path::new(&self.binary)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| self.binary.clone())
    }

    /// Resolve the binary, failing fast when it is not installed
    pub fn locate(&self) -> Result<ToolInfo, DomainError> {
        let path = which::which(&self.binary).map_err(|_| DomainError::InstallationRequired {
            tool: self.tool_name(),
        })?;
        Ok(ToolInfo {
            name: self.tool_name(),
            path,
        })
    }

    /// Run the tool to completion and capture its output.
    ///
    /// A non-zero exit status is not an error here; callers decide.
    pub async fn run<I, S>(&self, args: I) -> Result<Output, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running {}: {:?}", self.tool_name(), command.as_std());

        let output_future = command.output();
        let result = match self.timeout_secs {
            Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), output_future).await
            {
                Ok(result) => result,
                Err(_) => {
                    warn!("{} timed out after {} seconds", self.tool_name(), secs);
                    return Err(DomainError::Timeout {
                        tool: self.tool_name(),
                        secs,
                    });
                }
            },
            None => output_future.await,
        };

        result.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DomainError::InstallationRequired {
                tool: self.tool_name(),
            },
            _ => DomainError::external_tool(
                self.tool_name(),
                format!("failed to start: {}", e),
                None,
                None,
            ),
        })
    }
}

/// Trimmed stderr, or `None` when the tool printed nothing
pub fn stderr_text(output: &Output) -> Option<String> {
    let text = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
