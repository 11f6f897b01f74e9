//! Persistent key-value storage for the resolved location.
//!
//! The browser keeps this in `localStorage`; here it is a trait so tests can
//! use [`MemoryStore`] and the CLI can use [`JsonFileStore`]. Access is
//! synchronous and unguarded across processes.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::StoreError;
use crate::types::CachedLocation;

pub const POSTCODE_KEY: &str = "userPostcode";
pub const DISTANCE_KEY: &str = "nearestCollectionDistance";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// A flat JSON object of string values on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens `path`, starting empty if it does not exist.
    ///
    /// A file that is not a JSON object of strings is logged and ignored; it
    /// is replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<BTreeMap<String, String>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring unreadable location cache"
                );
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        let encoded = serde_json::to_string_pretty(&*entries)?;
        std::fs::write(&self.path, encoded)?;
        Ok(())
    }
}

/// Reads the cached location, if both keys are present and the distance is a
/// finite, non-negative number.
#[must_use]
pub fn read_cached_location(store: &dyn KeyValueStore) -> Option<CachedLocation> {
    let postcode = store.get(POSTCODE_KEY).filter(|p| !p.trim().is_empty())?;
    let nearest_distance_km = store
        .get(DISTANCE_KEY)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)?;

    Some(CachedLocation {
        postcode,
        nearest_distance_km,
    })
}

/// Persists the location; the distance is written with two decimals.
///
/// # Errors
///
/// Returns [`StoreError`] if either key cannot be written.
pub fn write_cached_location(
    store: &dyn KeyValueStore,
    location: &CachedLocation,
) -> Result<(), StoreError> {
    store.set(POSTCODE_KEY, &location.postcode)?;
    store.set(
        DISTANCE_KEY,
        &format!("{:.2}", location.nearest_distance_km),
    )
}
