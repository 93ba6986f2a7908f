//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! The only durable service the desktop needs is a string key-value store, provided here by
//! `window.localStorage`. Native builds compile the same API and fall back to an in-memory store.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Host store selection and file system factory for runtime wiring.
pub mod adapters;
pub mod storage;

pub use adapters::{key_value_store, load_virtual_file_system, KeyValueStoreAdapter};
pub use storage::local_storage::WebLocalStorage;
