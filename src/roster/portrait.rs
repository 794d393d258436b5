//! Portrait asset collaborator.
//!
//! The character store owns portrait lifecycle: it requests a crop when a
//! character is added or refreshed and requests deletion when one is removed.
//! The actual image work lives behind [`PortraitCropper`] so the store never
//! touches pixels; per-class crop regions are configuration of the
//! surrounding app, not modeled here.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use thiserror::Error;

/// Failures from the portrait collaborator. The store logs these and falls
/// back to a missing portrait rather than blocking character creation.
#[derive(Debug, Error)]
pub enum PortraitError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("portrait source unavailable: {0}")]
    MissingSource(String),
}

/// Produces and removes local portrait files for characters.
#[async_trait]
pub trait PortraitCropper: Send + Sync {
    /// Produce a local portrait file from `source` for the given character.
    /// `class_name` lets implementations pick a class-specific crop region.
    async fn crop(
        &self,
        source: &str,
        character_id: &str,
        class_name: &str,
    ) -> Result<PathBuf, PortraitError>;

    /// Remove a previously produced portrait file.
    async fn delete(&self, path: &Path) -> Result<(), PortraitError>;
}

/// Filesystem-safe portrait filename derived from the character id.
pub fn portrait_filename(character_id: &str) -> String {
    format!(
        "{}.png",
        utf8_percent_encode(character_id, NON_ALPHANUMERIC)
    )
}

/// Filesystem-backed cropper: copies a local source file into the portrait
/// directory under a percent-encoded name. Stands in for the real image
/// pipeline when the app runs without one.
pub struct LocalPortraitStore {
    root: PathBuf,
}

impl LocalPortraitStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PortraitCropper for LocalPortraitStore {
    async fn crop(
        &self,
        source: &str,
        character_id: &str,
        _class_name: &str,
    ) -> Result<PathBuf, PortraitError> {
        let source_path = Path::new(source);
        if !source_path.is_file() {
            return Err(PortraitError::MissingSource(source.to_string()));
        }
        tokio::fs::create_dir_all(&self.root).await?;
        let dest = self.root.join(portrait_filename(character_id));
        tokio::fs::copy(source_path, &dest).await?;
        Ok(dest)
    }

    async fn delete(&self, path: &Path) -> Result<(), PortraitError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Cropper for deployments without portrait support; every crop reports a
/// missing source, which the store downgrades to "no portrait".
pub struct NoPortraits;

#[async_trait]
impl PortraitCropper for NoPortraits {
    async fn crop(
        &self,
        source: &str,
        _character_id: &str,
        _class_name: &str,
    ) -> Result<PathBuf, PortraitError> {
        Err(PortraitError::MissingSource(source.to_string()))
    }

    async fn delete(&self, _path: &Path) -> Result<(), PortraitError> {
        Ok(())
    }
}
