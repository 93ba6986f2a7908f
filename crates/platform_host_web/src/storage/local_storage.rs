//! `localStorage`-backed key-value store.
//!
//! The browser API is synchronous, so write failures (quota, private mode) surface directly as
//! [`StorageError`] values that the file system turns into its in-memory-only mode.

use platform_host::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Copy, Default)]
/// Key-value store backed by `window.localStorage`.
pub struct WebLocalStorage;

impl WebLocalStorage {
    /// Returns `true` when `window.localStorage` can be reached.
    pub fn is_available(self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .is_some()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn storage(self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| StorageError::Unavailable("localStorage unavailable".to_string()))
    }
}

impl KeyValueStore for WebLocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            self.storage()?
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(format!("localStorage get_item failed: {e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Err(StorageError::Unavailable(
                "localStorage requires a browser host".to_string(),
            ))
        }
    }

    fn save(&self, key: &str, raw: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            self.storage()?
                .set_item(key, raw)
                .map_err(|e| StorageError::Write(format!("localStorage set_item failed: {e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw);
            Err(StorageError::Unavailable(
                "localStorage requires a browser host".to_string(),
            ))
        }
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            self.storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Write(format!("localStorage remove_item failed: {e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Err(StorageError::Unavailable(
                "localStorage requires a browser host".to_string(),
            ))
        }
    }
}
