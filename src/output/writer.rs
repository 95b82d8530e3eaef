//! Metadata and plan artifact persistence

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::PlanArtifact;
use crate::domain::rules::OutputNaming;
use crate::ports::FsPort;
use crate::probe::with_source_path;

/// Reads and writes the JSON artifacts passed between stages
pub struct ArtifactWriter {
    fs: Arc<dyn FsPort>,
}

impl ArtifactWriter {
    pub fn new(fs: Arc<dyn FsPort>) -> Self {
        Self { fs }
    }

    /// Save a probe report as `<metadata_dir>/<base>.json`
    pub async fn write_metadata(
        &self,
        metadata_dir: &Path,
        source: &Path,
        report: Value,
    ) -> Result<PathBuf, DomainError> {
        let naming = OutputNaming::for_source(source)?;
        let source = self.fs.absolute_path(source).await?;
        let artifact = with_source_path(report, &source)?;

        let path = metadata_dir.join(naming.metadata_file_name());
        self.write_json(&path, &artifact).await?;
        info!("Metadata saved to {}", path.display());
        Ok(path)
    }

    pub async fn read_metadata(&self, path: &Path) -> Result<Value, DomainError> {
        self.read_json(path).await
    }

    pub async fn write_plan(&self, path: &Path, plan: &PlanArtifact) -> Result<(), DomainError> {
        self.write_json(path, plan).await?;
        info!("Plan saved to {}", path.display());
        Ok(())
    }

    pub async fn read_plan(&self, path: &Path) -> Result<PlanArtifact, DomainError> {
        self.read_json(path).await
    }

    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), DomainError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| DomainError::Input(format!("Failed to serialize {}: {}", path.display(), e)))?;
        self.fs.write_text(path, &text).await
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, DomainError> {
        let text = self.fs.read_text(path).await?;
        serde_json::from_str(&text)
            .map_err(|e| DomainError::Input(format!("Invalid JSON in {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FsLocalAdapter;
    use serde_json::json;
    use tempfile::TempDir;

    fn writer() -> ArtifactWriter {
        ArtifactWriter::new(Arc::new(FsLocalAdapter::new()))
    }

    #[tokio::test]
    async fn test_metadata_artifact_carries_source_path() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("movie.mkv");
        let report = json!({ "format": { "duration": "10.0" }, "streams": [] });

        let path = writer()
            .write_metadata(&dir.path().join("metadata"), &source, report)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("metadata").join("movie.json"));
        let saved = writer().read_metadata(&path).await.unwrap();
        assert_eq!(saved["input_video_path"], source.to_string_lossy().as_ref());
        assert_eq!(saved["format"]["duration"], "10.0");
    }

    #[tokio::test]
    async fn test_plan_round_trip() {
        let dir = TempDir::new().unwrap();
        let plan = PlanArtifact {
            max_duration_sec: 409,
            duration_sec: 650,
            target_size_mb: 100.0,
            telegram_mode: false,
            will_split: true,
            estimated_parts: 2,
            input_video_path: "/v/a.mp4".to_string(),
        };
        let path = dir.path().join("plan.json");
        writer().write_plan(&path, &plan).await.unwrap();
        assert_eq!(writer().read_plan(&path).await.unwrap(), plan);
    }

    #[tokio::test]
    async fn test_read_plan_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "{\"max_duration_sec\": \"soon\"}").unwrap();
        assert!(matches!(
            writer().read_plan(&path).await,
            Err(DomainError::Input(_))
        ));
    }
}
