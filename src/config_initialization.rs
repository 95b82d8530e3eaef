//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use tracing::{debug, info};

use crate::adapters::TomlConfigAdapter;
use crate::app::config::AppConfig;
use crate::cli::{Cli, Commands};
use crate::error::{SplitMergeError, SplitMergeResult};

/// Prefix of environment overrides, e.g. `SPLITMERGE_FFMPEG`
pub const ENV_PREFIX: &str = "SPLITMERGE_";

/// Build configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> SplitMergeResult<AppConfig> {
    let mut config = load_config_file(cli)?;
    apply_environment_overrides(&mut config, |key| std::env::var(key).ok())?;
    apply_cli_overrides(&mut config, cli);

    config
        .validate()
        .map_err(|e| SplitMergeError::config(e.to_string()))?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Explicit `--config` must exist; otherwise the first discovered file wins
fn load_config_file(cli: &Cli) -> SplitMergeResult<AppConfig> {
    let adapter = TomlConfigAdapter::new();
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => adapter.discover(),
    };

    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            adapter
                .load(&path)
                .map_err(|e| SplitMergeError::config(e.to_string()))
        }
        None => Ok(AppConfig::default()),
    }
}

/// Apply `SPLITMERGE_*` variables read through `lookup`
pub fn apply_environment_overrides<F>(config: &mut AppConfig, lookup: F) -> SplitMergeResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|v| !v.is_empty());
    let mut env_overrides = 0;

    if let Some(value) = var("FFMPEG") {
        config.ffmpeg = value;
        env_overrides += 1;
    }
    if let Some(value) = var("FFPROBE") {
        config.ffprobe = value;
        env_overrides += 1;
    }
    if let Some(value) = var("METADATA_DIR") {
        config.metadata_dir = PathBuf::from(value);
        env_overrides += 1;
    }
    if let Some(value) = var("OUTPUT_DIR") {
        config.output_dir = Some(PathBuf::from(value));
        env_overrides += 1;
    }
    if let Some(value) = var("WORK_DIR") {
        config.work_dir = Some(PathBuf::from(value));
        env_overrides += 1;
    }
    if let Some(value) = var("TOOL_TIMEOUT_SECS") {
        let secs = value.parse::<u64>().map_err(|_| {
            SplitMergeError::config(format!(
                "{}TOOL_TIMEOUT_SECS must be a whole number of seconds, got {}",
                ENV_PREFIX, value
            ))
        })?;
        config.tool_timeout_secs = Some(secs);
        env_overrides += 1;
    }
    if let Some(value) = var("LOG_LEVEL") {
        config.log_level = value;
        env_overrides += 1;
    }
    if let Some(value) = var("LOG_FORMAT") {
        config.log_format = value;
        env_overrides += 1;
    }
    if let Some(value) = var("PROGRESS") {
        config.progress = value;
        env_overrides += 1;
    }

    if env_overrides > 0 {
        debug!("Applied {} environment variable overrides", env_overrides);
    }
    Ok(())
}

/// Apply global flags and the per-command directory flags
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(progress) = &cli.progress {
        config.progress = progress.clone();
    }

    match &cli.command {
        Commands::ExtractMetadata(args) => {
            if let Some(dir) = &args.metadata_dir {
                config.metadata_dir = dir.clone();
            }
        }
        Commands::SplitAndMerge(args) => {
            override_dirs(config, &args.output_dir, &args.work_dir);
        }
        Commands::Run(args) => {
            override_dirs(config, &args.output_dir, &args.work_dir);
        }
        Commands::ComputePlan(_) | Commands::CheckTools => {}
    }
}

fn override_dirs(config: &mut AppConfig, output_dir: &Option<PathBuf>, work_dir: &Option<PathBuf>) {
    if let Some(dir) = output_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(dir) = work_dir {
        config.work_dir = Some(dir.clone());
    }
}
