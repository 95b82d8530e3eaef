// Domain errors - Error types for the domain layer

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Source, metadata or plan file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Invalid arguments or artifact contents
    #[error("Invalid input: {0}")]
    Input(String),

    /// Prober exited non-zero or emitted unparseable output
    #[error("Probe failed: {message}")]
    Probe {
        message: String,
        stderr: Option<String>,
    },

    /// Probe output is missing required fields
    #[error("Invalid metadata: {0}")]
    Metadata(String),

    /// External executor exited non-zero
    #[error("{tool} failed: {message}")]
    ExternalTool {
        tool: String,
        message: String,
        exit_code: Option<i32>,
        stderr: Option<String>,
    },

    /// Expected chunk or part file is absent after a successful tool call
    #[error("Verification failed: {0}")]
    Verification(String),

    /// A required external binary is not installed
    #[error("{tool} is required but was not found in PATH; install it and retry")]
    InstallationRequired { tool: String },

    /// External tool did not finish in time
    #[error("{tool} timed out after {secs} seconds")]
    Timeout { tool: String, secs: u64 },

    /// File system operation failed
    #[error("File system error: {0}")]
    Fs(String),
}

/// Coarse classification used for propagation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Metadata,
    ExternalTool,
    Verification,
    Environment,
}

impl DomainError {
    /// Create an external tool failure error.
    pub fn external_tool(
        tool: impl Into<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
        stderr: Option<String>,
    ) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
            exit_code,
            stderr,
        }
    }

    /// Create a probe failure error.
    pub fn probe(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Probe {
            message: message.into(),
            stderr,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound(_) | DomainError::Input(_) => ErrorKind::Input,
            DomainError::Probe { .. } | DomainError::Metadata(_) => ErrorKind::Metadata,
            DomainError::ExternalTool { .. } | DomainError::Timeout { .. } => {
                ErrorKind::ExternalTool
            }
            DomainError::Verification(_) => ErrorKind::Verification,
            DomainError::InstallationRequired { .. } | DomainError::Fs(_) => {
                ErrorKind::Environment
            }
        }
    }

    /// Captured stderr of the failing tool, if any
    pub fn stderr(&self) -> Option<&str> {
        match self {
            DomainError::Probe { stderr, .. } | DomainError::ExternalTool { stderr, .. } => {
                stderr.as_deref()
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Fs(err.to_string())
    }
}
