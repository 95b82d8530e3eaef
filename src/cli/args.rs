//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the extract-metadata command
#[derive(Args, Debug)]
pub struct ExtractMetadataArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory for the metadata artifact
    #[arg(long)]
    pub metadata_dir: Option<PathBuf>,

    /// Summary format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the compute-plan command
#[derive(Args, Debug)]
pub struct ComputePlanArgs {
    /// Metadata artifact written by extract-metadata
    #[arg(short, long)]
    pub metadata: PathBuf,

    /// Split mode (by_size, by_duration)
    #[arg(long, default_value = "by_size")]
    pub mode: String,

    /// Target per part: gigabytes for by_size, minutes for by_duration
    #[arg(short, long, allow_negative_numbers = true)]
    pub target: f64,

    /// Cap parts at the 1900 MB upload limit
    #[arg(long)]
    pub telegram: bool,

    /// Plan artifact path (default: `<metadata stem>_plan.json` beside the metadata)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Summary format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the split-and-merge command
#[derive(Args, Debug)]
pub struct SplitAndMergeArgs {
    /// Plan artifact written by compute-plan
    #[arg(short, long)]
    pub plan: PathBuf,

    /// Directory for the merged parts (default: `<video dir>/output`)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Parent of the temporary working directory (default: the video's directory)
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Summary format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Split mode (by_size, by_duration)
    #[arg(long, default_value = "by_size")]
    pub mode: String,

    /// Target per part: gigabytes for by_size, minutes for by_duration
    #[arg(short, long, allow_negative_numbers = true)]
    pub target: f64,

    /// Cap parts at the 1900 MB upload limit
    #[arg(long)]
    pub telegram: bool,

    /// Directory for the merged parts (default: `<video dir>/output`)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Parent of the temporary working directory (default: the video's directory)
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Summary format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}
