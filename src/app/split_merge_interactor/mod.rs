// Split/merge interactor - Drives probe, plan, segment, group, merge and cleanup

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use crate::app::config::PipelineConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::OutputNaming;
use crate::engine::{Merger, ProgressCallback, Segmenter};
use crate::error::{SplitMergeError, SplitMergeResult, StageContext};
use crate::output::PartVerifier;
use crate::planner::{group_by_size, SplitPlanner};
use crate::ports::*;
use crate::probe::MetadataProbe;

/// Default output directory name, created next to the source
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Records every state a run passes through
#[derive(Debug, Clone)]
pub struct RunTracker {
    state: RunState,
    history: Vec<RunState>,
}

impl RunTracker {
    pub fn new(initial: RunState) -> Self {
        Self {
            state: initial,
            history: vec![initial],
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    pub fn advance(&mut self, next: RunState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::Input(format!(
                "Illegal run state transition {} -> {}",
                self.state, next
            )));
        }
        tracing::debug!("Run state {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Mark the run failed unless it already ended
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = RunState::Failed;
            self.history.push(RunState::Failed);
        }
    }
}

/// Orchestrates one split-and-merge run
pub struct SplitMergeInteractor {
    config: PipelineConfig,
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    progress: Arc<dyn ProgressCallback>,
}

impl SplitMergeInteractor {
    /// Create new split/merge interactor with injected ports
    pub fn new(
        config: PipelineConfig,
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        let progress = config.progress.callback();
        Self {
            config,
            probe_port,
            execute_port,
            fs_port,
            log_port,
            progress,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Locate both external tools
    pub async fn check_tools(&self) -> Result<Vec<ToolInfo>, DomainError> {
        let probe = self.probe_port.check_available().await?;
        let exec = self.execute_port.check_available().await?;
        Ok(vec![probe, exec])
    }

    /// Probe, plan and process a source in one go
    pub async fn run(&self, request: RunRequest) -> SplitMergeResult<RunReport> {
        let started_at = Utc::now();
        let mut tracker = RunTracker::new(RunState::Idle);

        let plan = match self.prepare(&mut tracker, &request).await {
            Ok(plan) => plan,
            Err(e) => {
                tracker.fail();
                self.log_port.error(&e.to_string()).await;
                return Err(e);
            }
        };

        self.process(tracker, plan, started_at).await
    }

    /// Process an already computed plan.
    ///
    /// The source is probed again so the timeline ends at its exact
    /// duration rather than the whole seconds kept in the plan artifact.
    pub async fn execute(&self, plan: ExecutionPlan) -> SplitMergeResult<RunReport> {
        let started_at = Utc::now();
        let mut tracker = RunTracker::new(RunState::Planned);

        let plan = match self.measure(plan).await {
            Ok(plan) => plan,
            Err(e) => {
                tracker.fail();
                self.log_port.error(&e.to_string()).await;
                return Err(e);
            }
        };

        self.process(tracker, plan, started_at).await
    }

    async fn measure(&self, plan: ExecutionPlan) -> SplitMergeResult<ExecutionPlan> {
        self.check_tools().await.stage(Stage::Preflight)?;
        self.require_source(&plan.input_path)
            .await
            .stage(Stage::Preflight)?;

        let probe = MetadataProbe::new(Arc::clone(&self.probe_port), Arc::clone(&self.fs_port));
        let (metadata, _) = probe.probe(&plan.input_path).await.stage(Stage::Probe)?;
        if metadata.duration_sec != plan.total_duration_sec {
            tracing::debug!(
                "Planned duration {}s, measured {}s",
                plan.total_duration_sec,
                metadata.duration_sec
            );
        }
        plan.with_measured_duration(metadata.duration_sec)
            .stage(Stage::Plan)
    }

    async fn prepare(
        &self,
        tracker: &mut RunTracker,
        request: &RunRequest,
    ) -> SplitMergeResult<ExecutionPlan> {
        self.check_tools().await.stage(Stage::Preflight)?;
        self.require_source(&request.input_path)
            .await
            .stage(Stage::Preflight)?;

        let probe = MetadataProbe::new(Arc::clone(&self.probe_port), Arc::clone(&self.fs_port));
        let (metadata, _) = probe.probe(&request.input_path).await.stage(Stage::Probe)?;
        tracker.advance(RunState::MetadataProbed).stage(Stage::Probe)?;

        let plan = SplitPlanner::new()
            .compute(
                &metadata,
                request.mode,
                request.target_value,
                request.telegram_capped,
            )
            .and_then(|plan| ExecutionPlan::from_split_plan(&plan))
            .stage(Stage::Plan)?;
        tracker.advance(RunState::Planned).stage(Stage::Plan)?;
        Ok(plan)
    }

    async fn require_source(&self, path: &Path) -> Result<(), DomainError> {
        if self.fs_port.file_exists(path).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound(path.to_path_buf()))
        }
    }

    async fn process(
        &self,
        mut tracker: RunTracker,
        plan: ExecutionPlan,
        started_at: chrono::DateTime<Utc>,
    ) -> SplitMergeResult<RunReport> {
        let result = self.process_in_work_dir(&mut tracker, &plan).await;

        match result {
            Ok((parts, chunk_count)) => {
                tracker.advance(RunState::Cleaned).stage(Stage::Cleanup)?;
                self.log_port
                    .log_event(
                        &LogEvent::new(LogLevel::Info, "Split and merge finished")
                            .with("parts", parts.len())
                            .with("chunks", chunk_count),
                    )
                    .await;
                Ok(RunReport {
                    parts,
                    chunk_count,
                    final_state: tracker.state(),
                    history: tracker.history().to_vec(),
                    started_at,
                    finished_at: Utc::now(),
                })
            }
            Err(e) => {
                tracker.fail();
                self.progress.on_error(&e.to_string());
                self.log_port.error(&e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Run segment, group and merge inside a fresh work dir, removing it
    /// afterwards whatever the outcome
    async fn process_in_work_dir(
        &self,
        tracker: &mut RunTracker,
        plan: &ExecutionPlan,
    ) -> SplitMergeResult<(Vec<Part>, usize)> {
        let source = self
            .fs_port
            .absolute_path(&plan.input_path)
            .await
            .stage(Stage::Segment)?;
        let source_dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let work_root = self.config.work_root.clone().unwrap_or_else(|| source_dir.clone());

        let work_dir = self
            .fs_port
            .create_work_dir(&work_root, &self.config.work_dir_prefix)
            .await
            .stage(Stage::Segment)?;
        tracing::debug!("Working directory: {}", work_dir.path().display());

        let result = self
            .segment_and_merge(tracker, plan, &source, &source_dir, work_dir.path())
            .await;
        self.close_work_dir(work_dir).await;
        result
    }

    async fn segment_and_merge(
        &self,
        tracker: &mut RunTracker,
        plan: &ExecutionPlan,
        source: &Path,
        source_dir: &Path,
        work_dir: &Path,
    ) -> SplitMergeResult<(Vec<Part>, usize)> {
        let segmenter = Segmenter::new(
            Arc::clone(&self.execute_port),
            Arc::clone(&self.fs_port),
            Arc::clone(&self.progress),
        );
        let chunks = segmenter
            .segment(source, plan.max_duration_sec, plan.total_duration_sec, work_dir)
            .await
            .stage(Stage::Segment)?;
        let chunk_count = chunks.len();
        tracker.advance(RunState::Segmented).stage(Stage::Segment)?;

        let output_dir = self
            .config
            .output_dir
            .clone()
            .unwrap_or_else(|| source_dir.join(DEFAULT_OUTPUT_DIR));
        self.fs_port
            .create_directory(&output_dir)
            .await
            .stage(Stage::Merge)?;

        let groups = group_by_size(chunks, plan.target_size_mb).stage(Stage::Group)?;
        tracker.advance(RunState::Grouped).stage(Stage::Group)?;
        self.log_port
            .info(&format!(
                "Grouped {} chunk(s) into {} part(s) of up to {:.2} MB",
                chunk_count,
                groups.len(),
                plan.target_size_mb
            ))
            .await;

        let parts = self.merge_groups(&groups, source, &output_dir, work_dir).await?;

        let verification = PartVerifier::new(Arc::clone(&self.fs_port))
            .verify(&parts, plan.target_size_mb, plan.total_duration_sec)
            .await
            .stage(Stage::Merge)?;
        if !verification.success {
            let failed: Vec<String> = verification
                .failed_checks()
                .map(|check| format!("{}: {}", check.name, check.details))
                .collect();
            return Err(SplitMergeError::stage(
                Stage::Merge,
                DomainError::Verification(failed.join("; ")),
            ));
        }
        tracker.advance(RunState::Merged).stage(Stage::Merge)?;

        Ok((parts, chunk_count))
    }

    async fn merge_groups(
        &self,
        groups: &[Group],
        source: &Path,
        output_dir: &Path,
        work_dir: &Path,
    ) -> SplitMergeResult<Vec<Part>> {
        let naming = OutputNaming::for_source(source).stage(Stage::Merge)?;
        let merger = Merger::new(Arc::clone(&self.execute_port), Arc::clone(&self.fs_port));
        let total = groups.len() as u64;

        self.progress.on_start("Merging", Some(total));
        let mut parts = Vec::with_capacity(groups.len());
        for (offset, group) in groups.iter().enumerate() {
            let index = offset + 1;
            let part = merger
                .merge(index, group, &naming.part_path(output_dir, index), work_dir)
                .await
                .stage(Stage::Merge)?;

            self.log_port
                .log_event(
                    &LogEvent::new(LogLevel::Debug, "Part merged")
                        .with("part", index)
                        .with("chunks", part.chunk_count)
                        .with("size_mb", format!("{:.2}", part.size_mb())),
                )
                .await;
            self.progress
                .on_progress(index as u64, Some(total), Some(part.file_name()));
            parts.push(part);
        }
        self.progress
            .on_complete(Some(format!("{} part(s) written", parts.len())));
        Ok(parts)
    }

    async fn close_work_dir(&self, work_dir: TempDir) {
        let path = work_dir.path().to_path_buf();
        if let Err(e) = work_dir.close() {
            self.log_port
                .warn(&format!(
                    "Failed to remove working directory {}: {}",
                    path.display(),
                    e
                ))
                .await;
        }
    }
}

/// Request for a full probe-plan-split-merge run
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input_path: PathBuf,
    pub mode: SplitMode,
    /// Gigabytes for `BySize`, minutes for `ByDuration`
    pub target_value: f64,
    pub telegram_capped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_follows_pipeline_order() {
        let mut tracker = RunTracker::new(RunState::Idle);
        for next in [
            RunState::MetadataProbed,
            RunState::Planned,
            RunState::Segmented,
            RunState::Grouped,
            RunState::Merged,
            RunState::Cleaned,
        ] {
            tracker.advance(next).unwrap();
        }
        assert_eq!(tracker.history().len(), 7);
        assert_eq!(tracker.state(), RunState::Cleaned);

        tracker.fail();
        assert_eq!(tracker.state(), RunState::Cleaned);
    }

    #[test]
    fn test_tracker_rejects_skips() {
        let mut tracker = RunTracker::new(RunState::Planned);
        assert!(tracker.advance(RunState::Merged).is_err());
        assert_eq!(tracker.state(), RunState::Planned);

        tracker.fail();
        assert_eq!(tracker.history(), &[RunState::Planned, RunState::Failed]);
        assert!(tracker.advance(RunState::Segmented).is_err());
    }
}
