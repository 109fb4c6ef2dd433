//! Local audio store
//!
//! Generated and uploaded audio lives on disk under a single directory.
//! Every saved file gets a fresh UUID-derived name so concurrent uploads and
//! responses never collide, and lookups never escape the directory.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// On-disk store for generated and uploaded audio files
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory the store writes into
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save audio bytes under a fresh unique filename
    ///
    /// Returns the relative path (`<dir>/<uuid>.<ext>`) suitable for the
    /// `audio_filepath` response field and later `/audios/{filename}` lookup.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub async fn save(&self, audio: &[u8], extension: &str) -> Result<String> {
        let filename = format!("{}.{extension}", uuid::Uuid::new_v4());
        let path = self.dir.join(&filename);

        tokio::fs::write(&path, audio).await?;
        tracing::debug!(path = %path.display(), bytes = audio.len(), "saved audio file");

        Ok(path.display().to_string())
    }

    /// Resolve a stored filename to its on-disk path
    ///
    /// # Errors
    ///
    /// Returns error if the name would escape the audio directory
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if !is_safe_name(filename) {
            return Err(Error::Store(format!("invalid audio filename: {filename}")));
        }
        Ok(self.dir.join(filename))
    }

    /// Read a previously saved file by the path returned from [`save`]
    ///
    /// The path must point inside the audio directory.
    ///
    /// # Errors
    ///
    /// Returns error if the path is outside the store or unreadable
    ///
    /// [`save`]: AudioStore::save
    pub async fn read(&self, filepath: &str) -> Result<Vec<u8>> {
        let path = Path::new(filepath);
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Store(format!("invalid audio path: {filepath}")))?;

        // Accept only paths that land inside the store directory.
        if path.parent().is_some_and(|p| !p.as_os_str().is_empty()) && path.parent() != Some(&*self.dir)
        {
            return Err(Error::Store(format!("audio path outside store: {filepath}")));
        }

        let resolved = self.resolve(filename)?;
        Ok(tokio::fs::read(resolved).await?)
    }
}

/// Reject names with path separators, traversal components, or hidden-file
/// prefixes
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}
