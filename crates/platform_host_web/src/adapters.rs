use std::rc::Rc;

use platform_host::{
    Clock, KeyValueStore, MemoryKeyValueStore, StorageError, SystemClock, VirtualFileSystem,
};

use crate::WebLocalStorage;

/// Adapter enum that erases the concrete key-value backend behind [`KeyValueStore`].
#[derive(Debug, Clone)]
pub enum KeyValueStoreAdapter {
    /// Browser `localStorage`.
    Browser(WebLocalStorage),
    /// Process-local fallback used when `localStorage` cannot be reached.
    Memory(MemoryKeyValueStore),
}

impl KeyValueStore for KeyValueStoreAdapter {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Browser(store) => store.load(key),
            Self::Memory(store) => store.load(key),
        }
    }

    fn save(&self, key: &str, raw: &str) -> Result<(), StorageError> {
        match self {
            Self::Browser(store) => store.save(key, raw),
            Self::Memory(store) => store.save(key, raw),
        }
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::Browser(store) => store.delete(key),
            Self::Memory(store) => store.delete(key),
        }
    }
}

/// Returns the best available key-value store for the current host.
pub fn key_value_store() -> KeyValueStoreAdapter {
    let browser = WebLocalStorage;
    if browser.is_available() {
        KeyValueStoreAdapter::Browser(browser)
    } else {
        tracing::warn!("localStorage unavailable; desktop state will not survive a reload");
        KeyValueStoreAdapter::Memory(MemoryKeyValueStore::default())
    }
}

/// Loads the virtual file system from the selected host store using the wall clock.
pub fn load_virtual_file_system() -> VirtualFileSystem {
    let store: Rc<dyn KeyValueStore> = Rc::new(key_value_store());
    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    VirtualFileSystem::load(store, clock)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_host_falls_back_to_memory_store() {
        let store = key_value_store();
        assert!(matches!(store, KeyValueStoreAdapter::Memory(_)));
        store.save("k", "v").expect("memory save");
        assert_eq!(store.load("k").expect("load"), Some("v".to_string()));
    }

    #[test]
    fn native_host_loads_seeded_file_system() {
        let vfs = load_virtual_file_system();
        assert!(vfs.exists("/home/user/Documents/welcome.txt"));
    }
}
