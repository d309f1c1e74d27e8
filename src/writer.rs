//! Page persistence.
//!
//! Each page lands in its own file named after its 1-based page number,
//! zero-padded to four digits: index 0 becomes `0001.jpg`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Extension used for saved page images.
pub const PAGE_EXTENSION: &str = "jpg";

/// Errors raised while saving a page.
#[derive(Debug, Error)]
pub enum WriteError {
    /// File system error writing the page.
    #[error("IO error writing page to {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Returns the file name for the page at zero-based `index`.
#[must_use]
pub fn page_file_name(index: u32) -> String {
    format!("{:04}.{PAGE_EXTENSION}", u64::from(index) + 1)
}

/// Sink for downloaded pages.
#[async_trait]
pub trait PageWriter: Send + Sync {
    /// Persists the page at zero-based `index`.
    ///
    /// Returns the path written.
    async fn write_page(&self, index: u32, bytes: &[u8]) -> Result<PathBuf, WriteError>;
}

/// Writes pages as individual files inside one directory.
#[derive(Debug, Clone)]
pub struct DirectoryPageWriter {
    directory: PathBuf,
}

impl DirectoryPageWriter {
    /// Creates a writer for an existing directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory pages are written into.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Full path for the page at zero-based `index`.
    #[must_use]
    pub fn page_path(&self, index: u32) -> PathBuf {
        self.directory.join(page_file_name(index))
    }
}

#[async_trait]
impl PageWriter for DirectoryPageWriter {
    async fn write_page(&self, index: u32, bytes: &[u8]) -> Result<PathBuf, WriteError> {
        let path = self.page_path(index);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| WriteError::io(&path, source))?;
        debug!(page = index + 1, path = %path.display(), bytes = bytes.len(), "page written");
        Ok(path)
    }
}
