//! Duration-bounded chunk extraction

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::Chunk;
use crate::domain::rules::OutputNaming;
use crate::engine::progress::ProgressCallback;
use crate::planner::chunk_windows;
use crate::ports::{ExecutePort, FsPort};

/// Cuts a source into contiguous stream-copied chunks
pub struct Segmenter {
    executor: Arc<dyn ExecutePort>,
    fs: Arc<dyn FsPort>,
    progress: Arc<dyn ProgressCallback>,
}

impl Segmenter {
    pub fn new(
        executor: Arc<dyn ExecutePort>,
        fs: Arc<dyn FsPort>,
        progress: Arc<dyn ProgressCallback>,
    ) -> Self {
        Self {
            executor,
            fs,
            progress,
        }
    }

    /// Extract every chunk of `source` into `work_dir`, in order.
    ///
    /// Stops at the first failed extraction; chunks already written are
    /// left for the caller to clean up with the work dir.
    pub async fn segment(
        &self,
        source: &Path,
        max_duration_sec: f64,
        total_duration_sec: f64,
        work_dir: &Path,
    ) -> Result<Vec<Chunk>, DomainError> {
        let naming = OutputNaming::for_source(source)?;
        let windows = chunk_windows(max_duration_sec, total_duration_sec)?;
        let total = windows.len() as u64;

        info!(
            "Splitting {} into {} chunk(s) of up to {:.3}s",
            source.display(),
            total,
            max_duration_sec
        );
        self.progress.on_start("Splitting", Some(total));

        let mut chunks = Vec::with_capacity(windows.len());
        for window in windows {
            let path = work_dir.join(naming.chunk_file_name(window.index));
            debug!(
                "Extracting chunk {} [{:.3}s, {:.3}s) to {}",
                window.index,
                window.start_sec,
                window.end_sec(),
                path.display()
            );

            let chunk = match self.extract(source, window.start_sec, window.duration_sec, &path).await {
                Ok(size_bytes) => Chunk {
                    index: window.index,
                    path,
                    start_offset_sec: window.start_sec,
                    duration_sec: window.duration_sec,
                    size_bytes,
                },
                Err(e) => {
                    self.progress.on_error(&e.to_string());
                    return Err(e);
                }
            };

            self.progress.on_progress(
                window.index as u64 + 1,
                Some(total),
                Some(format!("{} ({:.2} MB)", naming.chunk_file_name(window.index), chunk.size_mb())),
            );
            chunks.push(chunk);
        }

        self.progress
            .on_complete(Some(format!("{} chunk(s) created", chunks.len())));
        Ok(chunks)
    }

    async fn extract(
        &self,
        source: &Path,
        start_sec: f64,
        duration_sec: f64,
        output: &Path,
    ) -> Result<f64, DomainError> {
        self.executor
            .extract_range(source, start_sec, duration_sec, output)
            .await?;

        if !self.fs.file_exists(output).await? {
            return Err(DomainError::Verification(format!(
                "Chunk was not created: {}",
                output.display()
            )));
        }
        Ok(self.fs.get_file_size(output).await? as f64)
    }
}
