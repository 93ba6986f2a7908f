//! Durable key-value storage contracts and in-memory adapters.
//!
//! Values are raw JSON text stored per key, matching browser `localStorage` semantics. Calls are
//! synchronous: callers observe the write outcome before returning to the event loop.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures reported by [`KeyValueStore`] implementations.
pub enum StorageError {
    /// The backing store cannot be reached (missing API, private mode, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The store rejected a write (quota, read-only, ...).
    #[error("storage write failed: {0}")]
    Write(String),
    /// The value could not be converted to or from JSON.
    #[error("storage serialization failed: {0}")]
    Serialize(String),
}

/// Host service for durable string values keyed by name.
pub trait KeyValueStore {
    /// Loads the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Saves `raw` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the store rejects the write.
    fn save(&self, key: &str, raw: &str) -> Result<(), StorageError>;

    /// Deletes `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the store rejects the delete.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string.
///
/// Clones share the same map, so tests can keep a handle and inspect what was persisted. Writes
/// can be switched off with [`MemoryKeyValueStore::set_read_only`] to simulate a full quota.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<RefCell<bool>>,
}

impl MemoryKeyValueStore {
    /// Makes subsequent writes fail (or succeed again).
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.borrow_mut() = read_only;
    }

    /// Returns the raw value for `key` without going through the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    fn ensure_writable(&self) -> Result<(), StorageError> {
        if *self.read_only.borrow() {
            return Err(StorageError::Write("quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, raw: &str) -> Result<(), StorageError> {
        self.ensure_writable()?;
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_writable()?;
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub fn load_typed_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| StorageError::Serialize(e.to_string()))?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_typed_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialize(e.to_string()))?;
    store.save(key, &raw)
}
