use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, FsLocalAdapter, TracingLogAdapter};
use crate::app::config::AppConfig;
use crate::app::{
    extract_metadata_interactor::ExtractMetadataInteractor, plan_interactor::PlanInteractor,
    split_merge_interactor::SplitMergeInteractor,
};
use crate::domain::errors::DomainError;
use crate::ports::{ExecutePort, FsPort, LogLevel, LogPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn extract_metadata_interactor(&self) -> Arc<ExtractMetadataInteractor>;
    fn plan_interactor(&self) -> Arc<PlanInteractor>;
    fn split_merge_interactor(&self) -> Arc<SplitMergeInteractor>;
}

pub struct DefaultAppContainer {
    extract_metadata_interactor: Arc<ExtractMetadataInteractor>,
    plan_interactor: Arc<PlanInteractor>,
    split_merge_interactor: Arc<SplitMergeInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffprobe/ffmpeg/local-fs adapters described by `config`
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let probe_port = Arc::new(FFprobeAdapter::new(
            config.ffprobe.clone(),
            config.tool_timeout_secs,
        ));
        let execute_port = Arc::new(FFmpegAdapter::new(
            config.ffmpeg.clone(),
            config.tool_timeout_secs,
        ));
        let fs_port = Arc::new(FsLocalAdapter::new());
        let log_port = Arc::new(TracingLogAdapter::with_min_level(LogLevel::parse(
            &config.log_level,
        )?));

        Self::with_ports(config, probe_port, execute_port, fs_port, log_port)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        config: &AppConfig,
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Result<Self, DomainError> {
        let extract_metadata_interactor = Arc::new(ExtractMetadataInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        let plan_interactor = Arc::new(PlanInteractor::new(
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        let split_merge_interactor = Arc::new(SplitMergeInteractor::new(
            config.pipeline_config()?,
            probe_port,
            execute_port,
            fs_port,
            log_port,
        ));

        Ok(Self {
            extract_metadata_interactor,
            plan_interactor,
            split_merge_interactor,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn extract_metadata_interactor(&self) -> Arc<ExtractMetadataInteractor> {
        Arc::clone(&self.extract_metadata_interactor)
    }

    fn plan_interactor(&self) -> Arc<PlanInteractor> {
        Arc::clone(&self.plan_interactor)
    }

    fn split_merge_interactor(&self) -> Arc<SplitMergeInteractor> {
        Arc::clone(&self.split_merge_interactor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.log_format = "xml".to_string();
        assert!(DefaultAppContainer::new(&config).is_err());
    }

    #[test]
    fn test_container_carries_pipeline_config() {
        let mut config = AppConfig::default();
        config.output_dir = Some("/data/parts".into());
        let container = DefaultAppContainer::new(&config).unwrap();
        assert_eq!(
            container.split_merge_interactor().config().output_dir,
            Some(std::path::PathBuf::from("/data/parts"))
        );
    }
}
