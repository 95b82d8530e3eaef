//! Human and machine readable stage summaries

use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::domain::model::{file_name_of, MediaMetadata, PlanArtifact, RunReport};
use crate::output::OutputFormat;
use crate::utils::Utils;

/// Flat view of probed metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataSummary {
    pub file_name: String,
    pub duration_sec: f64,
    pub size_mb: f64,
    pub bitrate_kbps: f64,
    pub path: String,
}

impl From<&MediaMetadata> for MetadataSummary {
    fn from(metadata: &MediaMetadata) -> Self {
        Self {
            file_name: file_name_of(&metadata.path),
            duration_sec: metadata.duration_sec,
            size_mb: round2(metadata.size_mb()),
            bitrate_kbps: round2(metadata.bitrate_kbps()),
            path: metadata.path.to_string_lossy().to_string(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>, DomainError> {
    let rendered = match format {
        OutputFormat::Text => return Ok(None),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| DomainError::Input(format!("Failed to render JSON: {}", e)))?,
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|e| DomainError::Input(format!("Failed to render YAML: {}", e)))?,
    };
    Ok(Some(rendered))
}

/// Renders the summaries printed after each stage
pub struct Summary;

impl Summary {
    pub fn metadata(metadata: &MediaMetadata, format: OutputFormat) -> Result<String, DomainError> {
        let summary = MetadataSummary::from(metadata);
        if let Some(rendered) = structured(&summary, format)? {
            return Ok(rendered);
        }

        Ok(format!(
            "Video metadata\n  File     : {}\n  Duration : {} ({:.2}s)\n  Size     : {:.2} MB\n  Bitrate  : {:.2} kbps\n  Path     : {}\n",
            summary.file_name,
            Utils::format_duration_words(summary.duration_sec),
            summary.duration_sec,
            summary.size_mb,
            summary.bitrate_kbps,
            summary.path
        ))
    }

    pub fn plan(plan: &PlanArtifact, format: OutputFormat) -> Result<String, DomainError> {
        if let Some(rendered) = structured(plan, format)? {
            return Ok(rendered);
        }

        Ok(format!(
            "Split plan\n  Duration       : {}\n  Max per part   : {}\n  Target size    : {:.2} MB\n  Telegram mode  : {}\n  Will split     : {}\n  Estimated parts: {}\n  Video          : {}\n",
            Utils::format_duration_words(plan.duration_sec as f64),
            Utils::format_duration_words(plan.max_duration_sec as f64),
            plan.target_size_mb,
            plan.telegram_mode,
            plan.will_split,
            plan.estimated_parts,
            plan.input_video_path
        ))
    }

    pub fn report(report: &RunReport, format: OutputFormat) -> Result<String, DomainError> {
        if let Some(rendered) = structured(report, format)? {
            return Ok(rendered);
        }

        let mut text = format!(
            "Created {} part(s) from {} chunk(s) in {:.1}s\n",
            report.parts.len(),
            report.chunk_count,
            (report.finished_at - report.started_at).num_milliseconds() as f64 / 1000.0
        );
        for part in &report.parts {
            text.push_str(&format!(
                "  {:>3}. {} ({:.2} MB, {}, {} chunk(s))\n",
                part.index,
                part.path.display(),
                part.size_mb(),
                Utils::format_duration_words(part.duration_sec),
                part.chunk_count
            ));
        }
        Ok(text)
    }
}
