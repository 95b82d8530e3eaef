//! Media metadata probing

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::MediaMetadata;
use crate::ports::{FsPort, ProbePort};

pub mod validator;

pub use validator::{metadata_from_report, source_path_from_artifact, with_source_path};

/// Reads duration, size and bitrate of a source through the prober
pub struct MetadataProbe {
    prober: Arc<dyn ProbePort>,
    fs: Arc<dyn FsPort>,
}

impl MetadataProbe {
    pub fn new(prober: Arc<dyn ProbePort>, fs: Arc<dyn FsPort>) -> Self {
        Self { prober, fs }
    }

    /// Probe `path`, returning the validated metadata and the full report
    pub async fn probe(&self, path: &Path) -> Result<(MediaMetadata, Value), DomainError> {
        if !self.fs.file_exists(path).await? {
            return Err(DomainError::NotFound(path.to_path_buf()));
        }

        let report = self.prober.probe(path).await?;
        let metadata = metadata_from_report(&report, path)?;
        info!(
            "Probed {}: {:.2}s, {:.2} MB, {:.0} kbps",
            path.display(),
            metadata.duration_sec,
            metadata.size_mb(),
            metadata.bitrate_kbps()
        );
        Ok((metadata, report))
    }
}
