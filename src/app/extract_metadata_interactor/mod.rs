// Extract metadata interactor - Probes a source and saves the metadata artifact

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::model::*;
use crate::error::{SplitMergeResult, StageContext};
use crate::output::ArtifactWriter;
use crate::ports::*;
use crate::probe::MetadataProbe;

/// Interactor for the metadata extraction stage
pub struct ExtractMetadataInteractor {
    probe: MetadataProbe,
    writer: ArtifactWriter,
    log_port: Arc<dyn LogPort>,
}

impl ExtractMetadataInteractor {
    /// Create new extract metadata interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            probe: MetadataProbe::new(probe_port, Arc::clone(&fs_port)),
            writer: ArtifactWriter::new(fs_port),
            log_port,
        }
    }

    /// Probe the source and persist the report next to the others
    pub async fn execute(
        &self,
        request: ExtractMetadataRequest,
    ) -> SplitMergeResult<ExtractMetadataResponse> {
        self.log_port
            .info(&format!(
                "Extracting metadata from {}",
                request.input_path.display()
            ))
            .await;

        let (metadata, report) = self.probe.probe(&request.input_path).await.stage(Stage::Probe)?;
        let artifact_path = self
            .writer
            .write_metadata(&request.metadata_dir, &request.input_path, report)
            .await
            .stage(Stage::Probe)?;

        self.log_port
            .log_event(
                &LogEvent::new(LogLevel::Info, "Metadata extracted")
                    .with("artifact", artifact_path.display())
                    .with("duration_sec", format!("{:.3}", metadata.duration_sec))
                    .with("size_mb", format!("{:.2}", metadata.size_mb())),
            )
            .await;

        Ok(ExtractMetadataResponse {
            metadata,
            artifact_path,
        })
    }
}

/// Request for metadata extraction
#[derive(Debug, Clone)]
pub struct ExtractMetadataRequest {
    pub input_path: PathBuf,
    pub metadata_dir: PathBuf,
}

impl ExtractMetadataRequest {
    pub fn new(input_path: impl Into<PathBuf>, metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            metadata_dir: metadata_dir.into(),
        }
    }
}

/// Response from metadata extraction
#[derive(Debug, Clone)]
pub struct ExtractMetadataResponse {
    pub metadata: MediaMetadata,
    pub artifact_path: PathBuf,
}
