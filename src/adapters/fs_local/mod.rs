// Local filesystem adapter - File system operations on the host

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
#[derive(Debug, Default, Clone)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        Ok(file_path.is_file())
    }

    async fn get_file_size(&self, file_path: &Path) -> Result<u64, DomainError> {
        let metadata = fs::metadata(file_path).map_err(|e| {
            DomainError::Fs(format!(
                "Failed to get file size of {}: {}",
                file_path.display(),
                e
            ))
        })?;
        Ok(metadata.len())
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(dir_path).map_err(|e| {
            DomainError::Fs(format!(
                "Failed to create directory {}: {}",
                dir_path.display(),
                e
            ))
        })
    }

    async fn read_text(&self, file_path: &Path) -> Result<String, DomainError> {
        if !file_path.exists() {
            return Err(DomainError::NotFound(file_path.to_path_buf()));
        }
        fs::read_to_string(file_path).map_err(|e| {
            DomainError::Fs(format!("Failed to read {}: {}", file_path.display(), e))
        })
    }

    async fn write_text(&self, file_path: &Path, contents: &str) -> Result<(), DomainError> {
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_directory(parent).await?;
        }
        fs::write(file_path, contents).map_err(|e| {
            DomainError::Fs(format!("Failed to write {}: {}", file_path.display(), e))
        })
    }

    async fn create_work_dir(&self, parent: &Path, prefix: &str) -> Result<TempDir, DomainError> {
        self.create_directory(parent).await?;
        tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(parent)
            .map_err(|e| {
                DomainError::Fs(format!(
                    "Failed to create working directory in {}: {}",
                    parent.display(),
                    e
                ))
            })
    }

    async fn absolute_path(&self, file_path: &Path) -> Result<PathBuf, DomainError> {
        if file_path.is_absolute() {
            return Ok(file_path.to_path_buf());
        }
        let cwd = std::env::current_dir()
            .map_err(|e| DomainError::Fs(format!("Failed to resolve current directory: {}", e)))?;
        Ok(cwd.join(file_path))
    }
}
