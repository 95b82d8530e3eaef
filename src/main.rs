//! SplitMerge video splitter
//!
//! Splits a video into size- or duration-bounded parts with ffmpeg stream
//! copy, without re-encoding.
//!
//! # Usage
//!
//! ```bash
//! splitmerge extract-metadata --input lecture.mp4
//! splitmerge compute-plan --metadata metadata/lecture.json --mode by_size --target 1.9 --telegram
//! splitmerge split-and-merge --plan metadata/lecture_plan.json
//! splitmerge run --input lecture.mp4 --mode by_duration --target 30
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use splitmerge_cli::app::DefaultAppContainer;
use splitmerge_cli::cli::{commands, Cli, Commands};
use splitmerge_cli::config_initialization::initialize_configuration_hierarchy;
use splitmerge_cli::ports::LogLevel;
use splitmerge_cli::utils::logging::{log_system_info, LogFormat, LoggingConfig};

/// Main entry point for the splitmerge CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;
    LoggingConfig::new(
        LogLevel::parse(&config.log_level)?,
        LogFormat::parse(&config.log_format)?,
    )
    .init();
    log_system_info();

    let container = DefaultAppContainer::new(&config)?;
    info!("Executing {} command", cli.command.name());

    let command = async move {
        match cli.command {
            Commands::ExtractMetadata(args) => {
                commands::extract_metadata(&container, &config, args).await
            }
            Commands::ComputePlan(args) => commands::compute_plan(&container, args).await,
            Commands::SplitAndMerge(args) => commands::split_and_merge(&container, args).await,
            Commands::Run(args) => commands::run(&container, args).await,
            Commands::CheckTools => commands::check_tools(&container).await,
        }
    };

    // Dropping the command future removes the work dir and kills any child
    tokio::select! {
        result = command => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cleaning up");
            Err(anyhow::anyhow!("Interrupted"))
        }
    }
}
