// Plan interactor - Computes and persists a split plan from a metadata artifact

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::{SplitMergeResult, StageContext};
use crate::output::ArtifactWriter;
use crate::planner::SplitPlanner;
use crate::ports::*;
use crate::probe::{metadata_from_report, source_path_from_artifact};

/// Interactor for the plan computation stage
pub struct PlanInteractor {
    planner: SplitPlanner,
    writer: ArtifactWriter,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl PlanInteractor {
    /// Create new plan interactor with injected ports
    pub fn new(fs_port: Arc<dyn FsPort>, log_port: Arc<dyn LogPort>) -> Self {
        Self {
            planner: SplitPlanner::new(),
            writer: ArtifactWriter::new(Arc::clone(&fs_port)),
            fs_port,
            log_port,
        }
    }

    /// Plan from the metadata artifact and write the plan artifact
    pub async fn execute(&self, request: PlanRequest) -> SplitMergeResult<PlanResponse> {
        self.compute(&request).await.stage(Stage::Plan)
    }

    /// Read a plan artifact back for the split-and-merge stage
    pub async fn load_plan(&self, plan_path: &Path) -> SplitMergeResult<(PlanArtifact, ExecutionPlan)> {
        let load = async {
            let artifact = self.writer.read_plan(plan_path).await?;
            let plan = ExecutionPlan::from_artifact(&artifact)?;
            Ok::<_, DomainError>((artifact, plan))
        };
        let (artifact, plan) = load.await.stage(Stage::Plan)?;
        self.log_port
            .debug(&format!(
                "Loaded plan {}: {} part(s) of up to {}s",
                plan_path.display(),
                artifact.estimated_parts,
                artifact.max_duration_sec
            ))
            .await;
        Ok((artifact, plan))
    }

    async fn compute(&self, request: &PlanRequest) -> Result<PlanResponse, DomainError> {
        let report = self.writer.read_metadata(&request.metadata_path).await?;
        let source = source_path_from_artifact(&report)?;
        if !self.fs_port.file_exists(&source).await? {
            return Err(DomainError::NotFound(source));
        }

        let metadata = metadata_from_report(&report, &source)?;
        let plan = self.planner.compute(
            &metadata,
            request.mode,
            request.target_value,
            request.telegram_capped,
        )?;
        let artifact = PlanArtifact::from_plan(&plan)?;

        let plan_path = request
            .output_path
            .clone()
            .unwrap_or_else(|| default_plan_path(&request.metadata_path));
        self.writer.write_plan(&plan_path, &artifact).await?;

        self.log_port
            .log_event(
                &LogEvent::new(LogLevel::Info, "Split plan computed")
                    .with("mode", plan.mode)
                    .with("max_duration_sec", artifact.max_duration_sec)
                    .with("estimated_parts", artifact.estimated_parts)
                    .with("plan", plan_path.display()),
            )
            .await;

        Ok(PlanResponse {
            metadata,
            plan,
            artifact,
            plan_path,
        })
    }
}

/// `<dir>/<stem>_plan.json` next to the metadata artifact
pub fn default_plan_path(metadata_path: &Path) -> PathBuf {
    let stem = metadata_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "split".to_string());
    metadata_path.with_file_name(format!("{}_plan.json", stem))
}

/// Request for plan computation
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub metadata_path: PathBuf,
    pub mode: SplitMode,
    /// Gigabytes for `BySize`, minutes for `ByDuration`
    pub target_value: f64,
    pub telegram_capped: bool,
    pub output_path: Option<PathBuf>,
}

/// Response from plan computation
#[derive(Debug, Clone)]
pub struct PlanResponse {
    pub metadata: MediaMetadata,
    pub plan: SplitPlan,
    pub artifact: PlanArtifact,
    pub plan_path: PathBuf,
}
