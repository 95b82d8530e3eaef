//! Stream-copy segmentation and merging engine

pub mod merger;
pub mod progress;
pub mod segmenter;

pub use merger::Merger;
pub use progress::{ProgressCallback, ProgressMode};
pub use segmenter::Segmenter;

/// Concat manifest written next to the chunks
pub const MANIFEST_FILE_NAME: &str = "merge_list.txt";
