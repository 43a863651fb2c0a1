//! Key/value persistence
//!
//! The harness only needs string get/set: one best score per game and a
//! currency total. Browser builds use LocalStorage, everything else (tests,
//! the headless runner) uses an in-memory map.

use std::collections::HashMap;

use thiserror::Error;

use crate::games::GameId;

/// Prefix shared by every key this crate writes
pub const KEY_PREFIX: &str = "pulse_arcade";
pub const CURRENCY_KEY: &str = "pulse_arcade.currency";

pub fn best_score_key(game: GameId) -> String {
    format!("{KEY_PREFIX}.best.{game}")
}

/// A write the backing store refused
#[derive(Debug, Error)]
#[error("write to `{key}` rejected: {reason}")]
pub struct StoreError {
    pub key: String,
    pub reason: String,
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read an unsigned counter. Missing or non-numeric values read as 0.
pub fn read_u64<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> u64 {
    let Some(raw) = store.get(key) else {
        return 0;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("Ignoring non-numeric value {raw:?} for {key}");
            0
        }
    }
}

/// Write an unsigned counter, logging failures
pub fn write_u64<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, value: u64) -> bool {
    match store.set(key, &value.to_string()) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to persist {key}: {e}");
            false
        }
    }
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store; seeding does not count as writes
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            writes: 0,
        }
    }

    /// Successful `set` calls so far
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// `None` when the page has no LocalStorage (private mode, sandboxed iframe)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError {
                key: key.to_string(),
                reason: e.as_string().unwrap_or_else(|| "quota exceeded".to_string()),
            })
    }
}
