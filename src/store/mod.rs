//! Persistence of the receipt book and the company branding.

pub mod book;
pub mod file;

use std::collections::HashMap;

pub use book::ReceiptStore;
pub use file::FileStore;

/// Key holding the full receipt collection, newest first.
pub const HISTORY_KEY: &str = "receipt_history";
/// Key holding the reusable company branding.
pub const BRANDING_KEY: &str = "company_config";

/// Errors that can occur when reading or writing persisted state.
#[derive(Debug)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    Io(std::io::Error),
    /// A stored value is not valid JSON for its key.
    Corrupt { key: String, message: String },
    /// A value could not be encoded.
    Encode(String),
    /// A receipt was rejected before being written.
    Invalid(crate::core::ReceiptError),
    /// No receipt matches the given id or number.
    NotFound(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "storage error: {e}"),
            StoreError::Corrupt { key, message } => {
                write!(f, "stored value for '{key}' is corrupt: {message}")
            }
            StoreError::Encode(e) => write!(f, "encoding error: {e}"),
            StoreError::Invalid(e) => write!(f, "invalid receipt: {e}"),
            StoreError::NotFound(key) => write!(f, "receipt not found: {key}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<crate::core::ReceiptError> for StoreError {
    fn from(e: crate::core::ReceiptError) -> Self {
        StoreError::Invalid(e)
    }
}

/// Abstraction over a simple string key/value store.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Stores `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removes the value stored under `key`.
    fn clear(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store used primarily for tests.
#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing any encoding.
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Number of `save` and `clear` calls made so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes += 1;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        self.writes += 1;
        self.values.remove(key);
        Ok(())
    }
}
