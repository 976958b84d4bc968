//! History persistence in browser local storage.

use skinscan_core::{HISTORY_STORAGE_KEY, History, HistoryStore};
use wasm_bindgen::JsValue;

/// Errors that can occur when writing local storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Local storage is disabled or unavailable.
    #[error("local storage is not available")]
    Unavailable,

    /// A browser API call returned an error (e.g. quota exceeded).
    #[error("local storage error: {0}")]
    JsError(String),

    /// The history could not be serialized.
    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<JsValue> for StorageError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// [`HistoryStore`] backed by `window.localStorage`.
#[derive(Debug, Clone, Copy)]
pub struct LocalStorageHistory {
    key: &'static str,
}

impl Default for LocalStorageHistory {
    fn default() -> Self {
        Self {
            key: HISTORY_STORAGE_KEY,
        }
    }
}

impl LocalStorageHistory {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()?
            .ok_or(StorageError::Unavailable)
    }
}

impl HistoryStore for LocalStorageHistory {
    type Error = StorageError;

    fn load(&self) -> History {
        let raw = match Self::storage() {
            Ok(storage) => storage.get_item(self.key).ok().flatten(),
            Err(e) => {
                tracing::warn!("cannot read history: {e}");
                None
            }
        };
        History::from_json(raw.as_deref())
    }

    fn store(&mut self, history: &History) -> Result<(), Self::Error> {
        let json = history.to_json()?;
        Self::storage()?.set_item(self.key, &json)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        Self::storage()?.remove_item(self.key)?;
        Ok(())
    }
}
