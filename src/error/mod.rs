//! Error handling module for splitmerge

use thiserror::Error;

use crate::domain::errors::{DomainError, ErrorKind};
use crate::domain::model::Stage;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum SplitMergeError {
    /// A pipeline stage failed
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: DomainError,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SplitMergeError {
    pub fn stage(stage: Stage, source: DomainError) -> Self {
        SplitMergeError::Stage { stage, source }
    }

    pub fn config(message: impl Into<String>) -> Self {
        SplitMergeError::Config {
            message: message.into(),
        }
    }

    /// Stage that failed, if any
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            SplitMergeError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SplitMergeError::Stage { source, .. } => source.kind(),
            SplitMergeError::Config { .. } => ErrorKind::Input,
        }
    }

    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            SplitMergeError::Stage { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for pipeline operations
pub type SplitMergeResult<T> = std::result::Result<T, SplitMergeError>;

/// Attach a stage to domain errors
pub trait StageContext<T> {
    fn stage(self, stage: Stage) -> SplitMergeResult<T>;
}

impl<T> StageContext<T> for Result<T, DomainError> {
    fn stage(self, stage: Stage) -> SplitMergeResult<T> {
        self.map_err(|source| SplitMergeError::stage(stage, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wrapping() {
        let result: Result<(), DomainError> =
            Err(DomainError::Verification("part missing".to_string()));
        let err = result.stage(Stage::Merge).unwrap_err();

        assert_eq!(err.failed_stage(), Some(Stage::Merge));
        assert_eq!(err.kind(), ErrorKind::Verification);
        assert_eq!(
            err.to_string(),
            "merge stage failed: Verification failed: part missing"
        );
    }

    #[test]
    fn test_config_error_has_no_stage() {
        let err = SplitMergeError::config("bad key");
        assert_eq!(err.failed_stage(), None);
        assert_eq!(err.kind(), ErrorKind::Input);
    }
}
