//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::app::config::AppConfig;
use crate::app::container::AppContainer;
use crate::app::extract_metadata_interactor::ExtractMetadataRequest;
use crate::app::plan_interactor::PlanRequest;
use crate::app::split_merge_interactor::RunRequest;
use crate::cli::args::{ComputePlanArgs, ExtractMetadataArgs, RunArgs, SplitAndMergeArgs};
use crate::domain::model::SplitMode;
use crate::output::{OutputFormat, Summary};

fn output_format(format: &str) -> Result<OutputFormat> {
    OutputFormat::parse(format).map_err(anyhow::Error::from)
}

fn split_mode(mode: &str) -> Result<SplitMode> {
    SplitMode::parse(mode).map_err(anyhow::Error::from)
}

/// Execute the extract-metadata command
pub async fn extract_metadata(
    container: &dyn AppContainer,
    config: &AppConfig,
    args: ExtractMetadataArgs,
) -> Result<()> {
    let format = output_format(&args.format)?;
    let request = ExtractMetadataRequest::new(args.input.clone(), config.metadata_dir.clone());

    let response = container
        .extract_metadata_interactor()
        .execute(request)
        .await
        .with_context(|| format!("Failed to extract metadata from {}", args.input.display()))?;

    print!("{}", Summary::metadata(&response.metadata, format)?);
    if format == OutputFormat::Text {
        println!("Metadata saved to {}", response.artifact_path.display());
    }
    Ok(())
}

/// Execute the compute-plan command
pub async fn compute_plan(container: &dyn AppContainer, args: ComputePlanArgs) -> Result<()> {
    let format = output_format(&args.format)?;
    let request = PlanRequest {
        metadata_path: args.metadata.clone(),
        mode: split_mode(&args.mode)?,
        target_value: args.target,
        telegram_capped: args.telegram,
        output_path: args.output,
    };

    let response = container
        .plan_interactor()
        .execute(request)
        .await
        .with_context(|| format!("Failed to compute plan from {}", args.metadata.display()))?;

    print!("{}", Summary::plan(&response.artifact, format)?);
    if format == OutputFormat::Text {
        println!("Plan saved to {}", response.plan_path.display());
    }
    Ok(())
}

/// Execute the split-and-merge command
pub async fn split_and_merge(container: &dyn AppContainer, args: SplitAndMergeArgs) -> Result<()> {
    let format = output_format(&args.format)?;

    let (artifact, plan) = container
        .plan_interactor()
        .load_plan(&args.plan)
        .await
        .with_context(|| format!("Failed to load plan {}", args.plan.display()))?;
    if format == OutputFormat::Text {
        print!("{}", Summary::plan(&artifact, format)?);
    }

    let report = container
        .split_merge_interactor()
        .execute(plan)
        .await
        .with_context(|| format!("Failed to split {}", artifact.input_video_path))?;

    print!("{}", Summary::report(&report, format)?);
    Ok(())
}

/// Execute the run command
pub async fn run(container: &dyn AppContainer, args: RunArgs) -> Result<()> {
    let format = output_format(&args.format)?;
    let request = RunRequest {
        input_path: args.input.clone(),
        mode: split_mode(&args.mode)?,
        target_value: args.target,
        telegram_capped: args.telegram,
    };

    let report = container
        .split_merge_interactor()
        .run(request)
        .await
        .with_context(|| format!("Failed to split {}", args.input.display()))?;

    print!("{}", Summary::report(&report, format)?);
    Ok(())
}

/// Execute the check-tools command
pub async fn check_tools(container: &dyn AppContainer) -> Result<()> {
    let tools = container
        .split_merge_interactor()
        .check_tools()
        .await
        .context("Required tools are missing")?;

    for tool in tools {
        info!("Found {} at {}", tool.name, tool.path.display());
        println!("{:<8} {}", tool.name, tool.path.display());
    }
    Ok(())
}
