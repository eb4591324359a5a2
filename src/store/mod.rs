//! Persistence of the user's explicit theme choice.
//!
//! This module provides:
//!
//! - [`PreferenceStore`]: string key/value contract the resolver persists through
//! - [`MemoryStore`]: in-process map, shared between clones
//! - [`FileStore`]: JSON file on disk
//! - [`UnavailableStore`]: stand-in for contexts with no persistence at all

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// String key/value persistence.
///
/// The resolver only ever writes the two literal theme names under a single
/// key and never deletes anything.
pub trait PreferenceStore {
    /// Reads the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// A store that refuses every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_store_fails_both_ways() {
        let mut store = UnavailableStore;
        assert!(matches!(store.get("theme"), Err(StoreError::Unavailable)));
        assert!(matches!(
            store.set("theme", "dark"),
            Err(StoreError::Unavailable)
        ));
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn PreferenceStore> = Box::new(MemoryStore::new());
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }
}
