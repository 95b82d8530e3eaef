//! CLI module for splitmerge
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ComputePlanArgs, ExtractMetadataArgs, RunArgs, SplitAndMergeArgs};

/// SplitMerge video splitter
///
/// Cuts a video into parts bounded by size or duration using stream copy,
/// so nothing is re-encoded.
#[derive(Parser, Debug)]
#[command(name = "splitmerge")]
#[command(about = "Split videos into size- or duration-bounded parts without re-encoding")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, `[splitmerge]` table)
    #[arg(long, global = true, env = "SPLITMERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Progress reporting (log, json, none)
    #[arg(long, global = true)]
    pub progress: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe a video and save its metadata artifact
    ExtractMetadata(args::ExtractMetadataArgs),
    /// Compute a split plan from a metadata artifact
    ComputePlan(args::ComputePlanArgs),
    /// Split and merge a video according to a plan artifact
    SplitAndMerge(args::SplitAndMergeArgs),
    /// Probe, plan, split and merge in one go
    Run(args::RunArgs),
    /// Check that ffmpeg and ffprobe are installed
    CheckTools,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::ExtractMetadata(_) => "extract-metadata",
            Commands::ComputePlan(_) => "compute-plan",
            Commands::SplitAndMerge(_) => "split-and-merge",
            Commands::Run(_) => "run",
            Commands::CheckTools => "check-tools",
        }
    }
}
