// src/documents/store.rs
//
// The artifact store: a directory holding at most one "latest" file per
// (kind, format) slot. Overwrites are last-writer-wins by design; there
// is no versioning and no locking.

use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::common::ApiError;
use crate::documents::models::{slot_filename, DocumentFormat, DocumentKind, GeneratedDocument};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Attachment not found: {0}")]
    NotFound(String),

    #[error("Invalid attachment path: {0}")]
    InvalidPath(String),

    #[error("artifact store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::AttachmentNotFound(e.to_string()),
            StoreError::InvalidPath(_) => ApiError::InvalidAttachmentPath(e.to_string()),
            StoreError::Io(_) => ApiError::InternalServer(e.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open (creating if needed) the store rooted at `root`. The root is
    /// canonicalized so attachment resolution can compare real paths.
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fixed path of the (kind, format) slot.
    pub fn path_for(&self, kind: DocumentKind, format: DocumentFormat) -> PathBuf {
        self.root.join(slot_filename(kind, format))
    }

    /// Write a generated document into its slot.
    ///
    /// The bytes land in a uniquely named temp file first and are renamed
    /// into place, so an interrupted write can never leave a corrupt
    /// "latest" file. Concurrent writers to the same slot race and the
    /// last rename wins.
    pub async fn store(&self, document: &GeneratedDocument) -> Result<PathBuf, StoreError> {
        let temp_path = self.root.join(format!(".{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&temp_path, &document.bytes).await?;

        let dest = self.path_for(document.kind, document.format);
        if let Err(e) = tokio::fs::rename(&temp_path, &dest).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StoreError::Io(e));
        }

        info!(path = %dest.display(), bytes = document.bytes.len(), "Artifact stored");
        Ok(dest)
    }

    /// Resolve a caller-supplied attachment path to a verified file
    /// inside the store. Traversal outside the root is rejected before
    /// any existence information leaks.
    pub fn resolve_attachment(&self, raw: &str) -> Result<PathBuf, StoreError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(StoreError::InvalidPath("path is empty".to_string()));
        }

        if Path::new(raw)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            warn!(path = %raw, "Rejected attachment path with parent-dir components");
            return Err(StoreError::InvalidPath(raw.to_string()));
        }

        // Tolerate the path prefixes the frontend historically sent.
        let relative = raw.strip_prefix("backend/").unwrap_or(raw);
        let relative = relative.strip_prefix("generated/").unwrap_or(relative);

        let candidate = if Path::new(raw).is_absolute() {
            // Containment is decided lexically first, so a path outside
            // the root is rejected without revealing whether it exists.
            let candidate = PathBuf::from(raw);
            if !candidate.starts_with(&self.root) {
                warn!(path = %raw, "Rejected attachment path outside the artifact directory");
                return Err(StoreError::InvalidPath(raw.to_string()));
            }
            candidate
        } else {
            self.root.join(relative)
        };

        let canonical = candidate
            .canonicalize()
            .map_err(|_| StoreError::NotFound(raw.to_string()))?;

        // Canonicalization re-checks containment so a symlink inside the
        // root cannot point the path back outside it.
        if !canonical.starts_with(&self.root) {
            warn!(path = %raw, "Rejected attachment path outside the artifact directory");
            return Err(StoreError::InvalidPath(raw.to_string()));
        }

        Ok(canonical)
    }
}
