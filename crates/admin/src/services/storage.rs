//! Product image files on local disk.
//!
//! Files live under `<root>/public/images/` with random names; the paths
//! handed back are relative to `<root>` and are what the `products.image`
//! column stores.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use apola_core::storage::{IMAGE_DIRECTORY, extension_for, image_path, is_image_path};

/// Errors from image storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("refusing to touch path outside the image directory: {0}")]
    InvalidPath(String),

    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
}

/// An uploaded file, as read from a multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    /// File name supplied by the browser.
    pub file_name: Option<String>,
    /// Content type supplied by the browser.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Writes and removes product images below a storage root.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory served under `/storage`.
    #[must_use]
    pub fn public_dir(&self) -> PathBuf {
        self.root.join("public")
    }

    /// Write `upload` under a fresh random name and return its stored path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::UnsupportedType` unless the content type is an
    /// accepted raster image, and `StorageError::Io` if the directory or file
    /// cannot be written.
    #[instrument(skip(self, upload), fields(size = upload.bytes.len()))]
    pub async fn store(&self, upload: &Upload) -> Result<String, StorageError> {
        let content_type = upload.content_type.as_deref().unwrap_or_default();
        let ext = extension_for(content_type)
            .ok_or_else(|| StorageError::UnsupportedType(content_type.to_owned()))?;

        let dir = self.root.join(IMAGE_DIRECTORY);
        tokio::fs::create_dir_all(&dir).await?;

        let stored = image_path(&Uuid::new_v4().simple().to_string(), ext);
        tokio::fs::write(self.root.join(&stored), &upload.bytes).await?;

        debug!(path = %stored, "Stored image");
        Ok(stored)
    }

    /// Remove a stored image. A file that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` for paths outside the image
    /// directory and `StorageError::Io` if removal fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, stored_path: &str) -> Result<(), StorageError> {
        if !is_image_path(stored_path) {
            return Err(StorageError::InvalidPath(stored_path.to_owned()));
        }

        match tokio::fs::remove_file(self.root.join(stored_path)).await {
            Ok(()) => {
                debug!("Deleted image");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Image already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove an image, logging instead of failing.
    ///
    /// Used once the database no longer references the file.
    pub async fn delete_quietly(&self, stored_path: &str) {
        if let Err(e) = self.delete(stored_path).await {
            warn!(path = %stored_path, error = %e, "Failed to delete image");
        }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
