// Domain rules - Unit conversions, upload caps and naming policies

use std::path::{Path, PathBuf};

use crate::domain::errors::*;

/// Upload ceiling applied in telegram-capped mode, in MB
pub const TELEGRAM_CAP_MB: f64 = 1900.0;

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub const MB_PER_GB: f64 = 1024.0;

/// Extension used when the source has none
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Zero-padding width of chunk and part indices
pub const INDEX_WIDTH: usize = 3;

pub fn bytes_to_mb(bytes: f64) -> f64 {
    bytes / BYTES_PER_MB
}

/// Seconds of stream that fit in `size_mb` at a constant `bitrate_kbps`
pub fn duration_for_size(size_mb: f64, bitrate_kbps: f64) -> f64 {
    size_mb * 8.0 * 1024.0 / bitrate_kbps
}

/// MB produced by `duration_sec` of stream at a constant `bitrate_kbps`
pub fn size_for_duration(duration_sec: f64, bitrate_kbps: f64) -> f64 {
    bitrate_kbps / 8.0 * duration_sec / 1024.0
}

/// Business rules for the capped upload mode
pub struct UploadCapPolicy;

impl UploadCapPolicy {
    /// Clamp a size target to the cap when capping is enabled
    pub fn clamp_target_mb(target_mb: f64, telegram_capped: bool) -> f64 {
        if telegram_capped && target_mb > TELEGRAM_CAP_MB {
            TELEGRAM_CAP_MB
        } else {
            target_mb
        }
    }

    pub fn exceeds_cap(size_mb: f64, telegram_capped: bool) -> bool {
        telegram_capped && size_mb > TELEGRAM_CAP_MB
    }
}

/// Validate a user-provided split target
pub fn validate_target(target_value: f64) -> Result<f64, DomainError> {
    if !target_value.is_finite() {
        return Err(DomainError::Input(format!(
            "Target value must be a number, got {}",
            target_value
        )));
    }
    if target_value <= 0.0 {
        return Err(DomainError::Input(
            "Target value must be greater than 0".to_string(),
        ));
    }
    Ok(target_value)
}

/// Naming rules for files derived from a source video
#[derive(Debug, Clone, PartialEq)]
pub struct OutputNaming {
    base_name: String,
    extension: String,
}

impl OutputNaming {
    /// Derive naming from the source path
    pub fn for_source(source: &Path) -> Result<Self, DomainError> {
        let base_name = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                DomainError::Input(format!("Invalid source file path: {}", source.display()))
            })?;
        let extension = source
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        Ok(Self {
            base_name,
            extension,
        })
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `<base>_chunk_<NNN>.<ext>`, 0-based
    pub fn chunk_file_name(&self, index: usize) -> String {
        format!(
            "{}_chunk_{:0width$}.{}",
            self.base_name,
            index,
            self.extension,
            width = INDEX_WIDTH
        )
    }

    /// `<base>_part_<NNN>.<ext>`, 1-based
    pub fn part_file_name(&self, index: usize) -> String {
        format!(
            "{}_part_{:0width$}.{}",
            self.base_name,
            index,
            self.extension,
            width = INDEX_WIDTH
        )
    }

    pub fn part_path(&self, output_dir: &Path, index: usize) -> PathBuf {
        output_dir.join(self.part_file_name(index))
    }

    /// `<base>.json`, the metadata artifact name
    pub fn metadata_file_name(&self) -> String {
        format!("{}.json", self.base_name)
    }
}
