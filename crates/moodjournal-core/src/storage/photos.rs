//! App-owned photo directory.
//!
//! Photos attached to entries are copied in here; the entry keeps the
//! returned path string as an opaque reference.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::CoreError;

/// Directory of photo files owned by the journal.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the photo directory as `photo_<epoch-ms>.jpg` and
    /// return the new reference. The directory is created on first use.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the copy fails.
    pub fn save_photo(&self, source: &Path) -> Result<String, CoreError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }

        let mut stamp = Utc::now().timestamp_millis();
        let mut destination = self.dir.join(format!("photo_{stamp}.jpg"));
        // Two copies in the same millisecond would otherwise overwrite each other.
        while destination.exists() {
            stamp += 1;
            destination = self.dir.join(format!("photo_{stamp}.jpg"));
        }

        std::fs::copy(source, &destination)?;
        tracing::debug!(from = %source.display(), to = %destination.display(), "saved photo");
        Ok(destination.to_string_lossy().into_owned())
    }

    /// Best-effort delete. Failures are logged and swallowed.
    pub fn delete_photo(&self, reference: &str) {
        match std::fs::remove_file(reference) {
            Ok(()) => tracing::debug!(photo = reference, "deleted photo"),
            Err(e) => tracing::warn!(photo = reference, error = %e, "failed to delete photo"),
        }
    }
}
