//! Temporary storage capability.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::UploadConfig;

/// Where materialized uploads are written and later removed.
#[async_trait]
pub trait TempStorage: Send + Sync {
    /// Directory new temp files are created in.
    fn temp_dir(&self) -> &Path;

    async fn write(&self, path: &Path, contents: Bytes) -> io::Result<()>;

    async fn remove(&self, path: &Path) -> io::Result<()>;
}

/// `tokio::fs` backed storage.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    temp_dir: PathBuf,
}

impl LocalFilesystem {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    /// Storage rooted at the OS temp directory.
    pub fn system_temp() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// Storage in `[uploads] temp_dir`, or the OS temp directory.
    pub fn from_config(config: &UploadConfig) -> Self {
        match &config.temp_dir {
            Some(dir) => Self::new(dir),
            None => Self::system_temp(),
        }
    }
}

#[async_trait]
impl TempStorage for LocalFilesystem {
    fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    async fn write(&self, path: &Path, contents: Bytes) -> io::Result<()> {
        tokio::fs::write(path, &contents).await
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }
}
