//! Persistent cart storage.
//!
//! A single JSON file holds a string-to-string map; the cart occupies one
//! fixed key whose value is the JSON-serialized item list. The file is read
//! on open and rewritten wholesale after every successful mutation - there is
//! no incremental update and no transactional guarantee beyond the rewrite.
//! Absent or corrupt data always loads as an empty cart.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use shoebox_core::CartItem;

/// Storage key for the serialized cart.
pub const CART_KEY: &str = "shoebox:cart";

/// Errors that can occur when writing to the store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

// =============================================================================
// KvStore
// =============================================================================

/// File-backed string key-value store.
///
/// The whole map lives in one JSON file and is rewritten on every `set`.
/// Reads never fail: a missing or unreadable file is an empty map.
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    /// Open a store at the given file path. The file is created on first
    /// write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored value for a key, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    /// Store a value under a key, rewriting the whole file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be written.
    pub fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut map = self.read_map();
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read store file, treating as empty");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Store file is corrupt, treating as empty");
                BTreeMap::new()
            }
        }
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// Cart persistence over the key-value store.
///
/// Invariant: after every successful [`CartStore::save`] the persisted copy
/// matches the in-memory list exactly; [`CartStore::load`] restores it with
/// order and fields preserved.
#[derive(Debug, Clone)]
pub struct CartStore {
    kv: KvStore,
}

impl CartStore {
    /// Open a cart store backed by the given file path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            kv: KvStore::open(path),
        }
    }

    /// Load the persisted cart.
    ///
    /// Absent or corrupt data yields an empty cart; corruption is logged and
    /// never fatal.
    #[must_use]
    pub fn load(&self) -> Vec<CartItem> {
        let Some(raw) = self.kv.get(CART_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Stored cart is corrupt, starting with an empty cart");
                Vec::new()
            }
        }
    }

    /// Persist the full item list, replacing the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the file write fails.
    pub fn save(&self, items: &[CartItem]) -> Result<(), StorageError> {
        self.kv.set(CART_KEY, serde_json::to_string(items)?)
    }
}
