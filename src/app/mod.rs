// Application layer - Use case interactors

pub mod config;
pub mod container;
pub mod extract_metadata_interactor;
pub mod plan_interactor;
pub mod split_merge_interactor;

// Re-export interactors
pub use config::{AppConfig, PipelineConfig};
pub use container::{AppContainer, DefaultAppContainer};
pub use extract_metadata_interactor::ExtractMetadataInteractor;
pub use plan_interactor::PlanInteractor;
pub use split_merge_interactor::SplitMergeInteractor;
