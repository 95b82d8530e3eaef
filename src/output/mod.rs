//! Artifact persistence, summaries and part verification

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

pub mod summary;
pub mod verifier;
pub mod writer;

pub use summary::Summary;
pub use verifier::PartVerifier;
pub use writer::ArtifactWriter;

/// Rendering of stage summaries on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self, DomainError> {
        match format.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(DomainError::Input(format!(
                "Invalid output format: {}. Valid formats: text, json, yaml",
                format
            ))),
        }
    }
}

/// Outcome of checking the merged parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// No check failed
    pub success: bool,
    /// Individual verification checks
    pub checks: Vec<VerificationCheck>,
    /// Largest part size relative to the target, as a ratio
    pub max_size_ratio: f64,
}

impl VerificationResult {
    pub fn failed_checks(&self) -> impl Iterator<Item = &VerificationCheck> {
        self.checks.iter().filter(|check| !check.passed)
    }
}

/// Individual verification check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCheck {
    pub name: String,
    pub passed: bool,
    pub details: String,
}
