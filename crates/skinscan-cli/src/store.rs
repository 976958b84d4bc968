//! File-backed result history.

use std::io;
use std::path::{Path, PathBuf};

use skinscan_core::{History, HistoryStore};

/// Errors from writing the history file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file or its directory could not be written.
    #[error("history file error: {0}")]
    Io(#[from] io::Error),

    /// The history could not be serialized.
    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// [`HistoryStore`] keeping the same JSON array the web app keeps in local
/// storage, in a file.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    /// A store at `path`. Nothing is touched until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/skinscan/history.json`, if the platform has a data
    /// directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("skinscan").join("history.json"))
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    type Error = StoreError;

    fn load(&self) -> History {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => History::from_json(Some(&json)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => History::new(),
            Err(e) => {
                tracing::warn!("cannot read {}: {e}", self.path.display());
                History::new()
            }
        }
    }

    fn store(&mut self, history: &History) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, history.to_json()?)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
