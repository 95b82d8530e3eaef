//! Stream-copy concatenation of chunk groups into parts

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::{Group, Part};
use crate::engine::MANIFEST_FILE_NAME;
use crate::ports::{ExecutePort, FsPort};

/// Render a concat-demuxer manifest listing `paths` in order
pub fn manifest_contents(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("file '{}'\n", path.to_string_lossy().replace('\'', r"'\''")))
        .collect()
}

/// Merges each group of chunks into one part file
pub struct Merger {
    executor: Arc<dyn ExecutePort>,
    fs: Arc<dyn FsPort>,
}

impl Merger {
    pub fn new(executor: Arc<dyn ExecutePort>, fs: Arc<dyn FsPort>) -> Self {
        Self { executor, fs }
    }

    /// Concatenate `group` into `output_path` as part number `index`.
    ///
    /// The manifest lives in `work_dir` and is overwritten by the next group.
    pub async fn merge(
        &self,
        index: usize,
        group: &Group,
        output_path: &Path,
        work_dir: &Path,
    ) -> Result<Part, DomainError> {
        let mut chunk_paths = Vec::with_capacity(group.len());
        for chunk in group.chunks() {
            if !self.fs.file_exists(&chunk.path).await? {
                return Err(DomainError::Verification(format!(
                    "Chunk {} is missing before merge: {}",
                    chunk.index,
                    chunk.path.display()
                )));
            }
            chunk_paths.push(self.fs.absolute_path(&chunk.path).await?);
        }

        let manifest = work_dir.join(MANIFEST_FILE_NAME);
        self.fs
            .write_text(&manifest, &manifest_contents(&chunk_paths))
            .await?;
        debug!(
            "Merging {} chunk(s) via {} into {}",
            chunk_paths.len(),
            manifest.display(),
            output_path.display()
        );

        self.executor.concat(&manifest, output_path).await?;

        if !self.fs.file_exists(output_path).await? {
            return Err(DomainError::Verification(format!(
                "Merged part was not created: {}",
                output_path.display()
            )));
        }
        let size_bytes = self.fs.get_file_size(output_path).await? as f64;

        let part = Part {
            index,
            path: output_path.to_path_buf(),
            size_bytes,
            start_offset_sec: group.start_offset_sec(),
            duration_sec: group.duration_sec(),
            chunk_count: group.len(),
        };
        info!("Part {} finished: {} ({:.2} MB)", index, part.file_name(), part.size_mb());
        Ok(part)
    }
}
