//! Fire-and-forget removal of materialized upload files.
//!
//! # Design Decisions
//! - A temp path is tracked before its first byte is written, so partial
//!   writes and cancelled requests are cleaned up too
//! - `ReapGuard` issues the deletes when dropped, so a cancelled request
//!   future is cleaned up the same way as a finished one

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::observability::metrics;
use crate::upload::descriptor::UploadedFileDescriptor;
use crate::upload::storage::TempStorage;

/// Deletes temp files once their request is done.
///
/// Each delete is spawned on the event loop; callers on the response path
/// drop the returned handles. Failures are only logged at debug level.
#[derive(Clone)]
pub struct TempFileReaper {
    storage: Arc<dyn TempStorage>,
    runtime: Handle,
}

impl TempFileReaper {
    pub fn new(storage: Arc<dyn TempStorage>, runtime: Handle) -> Self {
        Self { storage, runtime }
    }

    /// Launch one delete per descriptor that has a temp path.
    pub fn reap(&self, files: &[UploadedFileDescriptor]) -> Vec<JoinHandle<()>> {
        self.reap_paths(
            files
                .iter()
                .filter_map(UploadedFileDescriptor::path)
                .map(Path::to_path_buf)
                .collect(),
        )
    }

    /// Launch one delete per path.
    pub fn reap_paths(&self, paths: Vec<PathBuf>) -> Vec<JoinHandle<()>> {
        paths
            .into_iter()
            .map(|path| {
                let storage = self.storage.clone();
                self.runtime.spawn(async move {
                    match storage.remove(&path).await {
                        Ok(()) => {
                            tracing::trace!(path = %path.display(), "Temp upload removed");
                            metrics::record_temp_file_removed(true);
                        }
                        Err(e) => {
                            tracing::debug!(path = %path.display(), error = %e, "Temp upload removal failed");
                            metrics::record_temp_file_removed(false);
                        }
                    }
                })
            })
            .collect()
    }

    /// Guard that reaps every path tracked through it once dropped.
    pub fn guard(&self) -> ReapGuard {
        ReapGuard {
            reaper: self.clone(),
            tracker: PathTracker::default(),
        }
    }
}

/// Shared list of temp paths written (or about to be written) for one
/// request.
#[derive(Debug, Clone, Default)]
pub struct PathTracker {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl PathTracker {
    pub fn track(&self, path: &Path) {
        self.paths
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(path.to_path_buf());
    }

    /// Paths tracked so far, in write order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn take(&self) -> Vec<PathBuf> {
        std::mem::take(
            &mut *self
                .paths
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

/// Reaps its tracked paths exactly once, when dropped.
pub struct ReapGuard {
    reaper: TempFileReaper,
    tracker: PathTracker,
}

impl ReapGuard {
    pub fn tracker(&self) -> &PathTracker {
        &self.tracker
    }
}

impl Drop for ReapGuard {
    fn drop(&mut self) {
        let paths = self.tracker.take();
        if !paths.is_empty() {
            let _ = self.reaper.reap_paths(paths);
        }
    }
}
