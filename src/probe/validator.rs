//! Probe report validation

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::errors::DomainError;
use crate::domain::model::MediaMetadata;

/// Key added to a probe report when it is saved as a metadata artifact
pub const INPUT_PATH_KEY: &str = "input_video_path";

/// Read a positive number from the report's `format` section.
///
/// ffprobe emits these as numeric strings; plain JSON numbers are accepted
/// too.
fn format_number(report: &Value, key: &str) -> Result<f64, DomainError> {
    let value = report
        .get("format")
        .and_then(|format| format.get(key))
        .ok_or_else(|| DomainError::Metadata(format!("format.{} is missing", key)))?;

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| DomainError::Metadata(format!("format.{} is not a number: {}", key, value)))?;

    if !number.is_finite() || number <= 0.0 {
        return Err(DomainError::Metadata(format!(
            "format.{} must be positive, got {}",
            key, number
        )));
    }
    Ok(number)
}

/// Extract duration, size and bitrate from a probe report
pub fn metadata_from_report(report: &Value, path: &Path) -> Result<MediaMetadata, DomainError> {
    let duration = format_number(report, "duration")?;
    let size = format_number(report, "size")?;
    let bit_rate = format_number(report, "bit_rate")?;
    MediaMetadata::new(path, duration, size, bit_rate)
}

/// Source video path recorded in a metadata artifact
pub fn source_path_from_artifact(artifact: &Value) -> Result<PathBuf, DomainError> {
    artifact
        .get(INPUT_PATH_KEY)
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| DomainError::Metadata(format!("{} is missing", INPUT_PATH_KEY)))
}

/// Attach the source path to a probe report
pub fn with_source_path(mut report: Value, path: &Path) -> Result<Value, DomainError> {
    let object = report
        .as_object_mut()
        .ok_or_else(|| DomainError::probe("Probe report is not a JSON object", None))?;
    object.insert(
        INPUT_PATH_KEY.to_string(),
        Value::String(path.to_string_lossy().to_string()),
    );
    Ok(report)
}
