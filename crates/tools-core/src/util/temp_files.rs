//! Screenshot file management
//!
//! Every capture is written to disk so clients that cannot display inline
//! images can still open the file. Files go to `$TMP/webshot-mcp/` unless a
//! directory is configured, and are named
//! `screenshot-<timestamp>-<seq>.<ext>`; the sequence number keeps names
//! unique when two captures land in the same instant.
//!
//! The manager tracks what it wrote. Tracked files are removed by
//! [`TempFileManager::cleanup_all`] and, unless `keep_files` is set, when the
//! last clone of the manager is dropped.
//!
//! # Examples
//!
//! ```
//! use tools_core::{model::ImageFormat, util::temp_files::TempFileManager};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let manager = TempFileManager::with_dir(dir.path());
//!
//! let (path, size) = manager.write_image(&[0u8; 16], ImageFormat::Png).unwrap();
//! assert_eq!(size, 16);
//! assert!(path.extension().is_some_and(|ext| ext == "png"));
//!
//! assert_eq!(manager.cleanup_all(), 1);
//! assert!(!path.exists());
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::{error::CaptureResult, model::ImageFormat};

/// Directory name used under the system temp dir
pub const DEFAULT_DIR_NAME: &str = "webshot-mcp";

/// A screenshot file written by the manager
#[derive(Debug, Clone, Serialize)]
pub struct TempFile {
    pub path:       PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

#[derive(Debug)]
struct Inner {
    dir:        PathBuf,
    keep_files: AtomicBool,
    seq:        AtomicU64,
    files:      Mutex<Vec<TempFile>>,
}

/// Thread-safe tracker for written screenshot files
///
/// Cloning is cheap and clones share state.
#[derive(Clone, Debug)]
pub struct TempFileManager {
    inner: Arc<Inner>,
}

impl TempFileManager {
    /// Manager writing to `$TMP/webshot-mcp/`
    pub fn new() -> Self {
        Self::with_dir(std::env::temp_dir().join(DEFAULT_DIR_NAME))
    }

    /// Manager writing to `dir`, created on first write
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            inner: Arc::new(Inner {
                dir:        dir.as_ref().to_path_buf(),
                keep_files: AtomicBool::new(false),
                seq:        AtomicU64::new(0),
                files:      Mutex::new(Vec::new()),
            }),
        }
    }

    /// Keeps files on disk when the manager is dropped
    ///
    /// The setting is shared with every clone.
    pub fn keep_files(self, keep: bool) -> Self {
        self.inner.keep_files.store(keep, Ordering::Relaxed);
        self
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Writes encoded image bytes to a new file and tracks it
    ///
    /// Returns the path and the number of bytes written.
    pub fn write_image(&self, data: &[u8], format: ImageFormat) -> CaptureResult<(PathBuf, u64)> {
        fs::create_dir_all(&self.inner.dir)?;

        let created_at = Utc::now();
        let seq = self.inner.seq.fetch_add(1, Ordering::Relaxed);
        let filename = format!(
            "screenshot-{}-{seq:04}.{}",
            created_at.format("%Y%m%dT%H%M%S%.3fZ"),
            format.extension()
        );
        let path = self.inner.dir.join(filename);

        fs::write(&path, data)?;
        let size_bytes = data.len() as u64;

        tracing::debug!(path = %path.display(), size_bytes, "wrote screenshot file");
        self.inner.files.lock().push(TempFile {
            path: path.clone(),
            created_at,
            size_bytes,
        });

        Ok((path, size_bytes))
    }

    /// Tracked files that still exist, oldest first
    pub fn list(&self) -> Vec<TempFile> {
        self.inner
            .files
            .lock()
            .iter()
            .filter(|f| f.path.exists())
            .cloned()
            .collect()
    }

    /// Number of tracked files
    pub fn count(&self) -> usize {
        self.inner.files.lock().len()
    }

    /// Deletes every tracked file and returns how many were removed
    ///
    /// Failures are logged and the file is forgotten either way.
    pub fn cleanup_all(&self) -> usize {
        let mut files = self.inner.files.lock();
        let mut removed = 0;
        for file in files.drain(..) {
            match fs::remove_file(&file.path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %file.path.display(), error = %e, "failed to remove screenshot file");
                }
            }
        }
        removed
    }
}

impl Default for TempFileManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempFileManager {
    fn drop(&mut self) {
        // Only the last clone cleans up
        if Arc::strong_count(&self.inner) == 1 && !self.inner.keep_files.load(Ordering::Relaxed) {
            self.cleanup_all();
        }
    }
}
