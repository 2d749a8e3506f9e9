//! Document Store
//!
//! Path-addressed JSON document persistence. Keys look like relative file
//! paths (`shows/index.json`, `shows/<id>/running_order.json`) and map to one
//! JSON document each. The store is a thin wrapper over blob storage: there
//! are no transactions, no version checks and no compare-and-swap.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs     - Trait, error type, key validation
//! ├── fs.rs      - Filesystem backend (one file per key)
//! └── memory.rs  - In-memory backend for tests and demos
//! ```
//!
//! # Contract
//!
//! - `read` of an absent key is `Ok(None)`, never an error; callers that want
//!   the read-with-default behavior use `read_or`.
//! - `write` fully replaces the document. Two concurrent read-modify-write
//!   cycles on the same key lose one update (last write wins). That is a
//!   property of the design, not a bug to patch with locks.
//! - `list_dir` parses every document under a prefix; a missing prefix is an
//!   empty listing.
//!
//! # Error Categories
//!
//! - `Unavailable` - the backend itself failed (I/O error, simulated outage)
//! - `Corrupt` - the stored bytes are not valid JSON
//! - `InvalidKey` - empty, absolute or traversing key, rejected up front

/// Filesystem-backed store
pub mod fs;

/// In-memory store
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use fs::FsStore;
pub use memory::MemoryStore;

/// Store handle shared across handlers and tasks
pub type SharedStore = Arc<dyn DocumentStore>;

/// Errors raised by the document store
///
/// An absent key is not an error; these cover the backend being unreachable,
/// a document that no longer parses, and keys rejected before touching the
/// backend.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// The storage backend could not be reached or failed mid-operation
    #[error("Store unavailable for '{key}': {message}")]
    Unavailable {
        /// Document key the operation targeted
        key: String,
        /// Human-readable backend error
        message: String,
    },

    /// The stored bytes exist but are not valid JSON
    #[error("Corrupt document at '{key}': {message}")]
    Corrupt {
        /// Document key holding the bad bytes
        key: String,
        /// Human-readable parse error
        message: String,
    },

    /// The key is empty, absolute, or traverses outside the store root
    #[error("Invalid document key '{key}'")]
    InvalidKey {
        /// The rejected key
        key: String,
    },
}

impl StoreError {
    /// Create an `Unavailable` error for a key
    pub fn unavailable(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            key: key.into(),
            message: err.to_string(),
        }
    }

    /// Create a `Corrupt` error for a key
    pub fn corrupt(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: err.to_string(),
        }
    }

    /// Create an `InvalidKey` error
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// The document key the error refers to
    pub fn key(&self) -> &str {
        match self {
            Self::Unavailable { key, .. } | Self::Corrupt { key, .. } | Self::InvalidKey { key } => {
                key
            }
        }
    }
}

/// Path-addressed JSON document storage
///
/// Object-safe so handlers can hold an `Arc<dyn DocumentStore>` and tests can
/// swap the filesystem backend for the in-memory one.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document. Absent keys are `Ok(None)`.
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Fully replace the document at `key`, creating parents as needed.
    async fn write(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Parse and return every document under `prefix`, in key order.
    /// A missing prefix is an empty listing.
    async fn list_dir(&self, prefix: &str) -> Result<Vec<Value>, StoreError>;

    /// Read with a caller-supplied default for absent keys
    async fn read_or(&self, key: &str, default: Value) -> Result<Value, StoreError> {
        Ok(self.read(key).await?.unwrap_or(default))
    }
}

/// Validate a document key before it reaches a backend
///
/// Keys are relative paths: non-empty, `/`-separated, no empty components,
/// no `.`/`..` components, no backslashes. The filesystem backend must never
/// be able to escape its root.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || key.starts_with('/') || key.ends_with('/') || key.contains('\\') {
        return Err(StoreError::invalid_key(key));
    }
    for component in key.split('/') {
        if component.is_empty() || component == "." || component == ".." {
            return Err(StoreError::invalid_key(key));
        }
    }
    Ok(())
}

/// Validate a listing prefix (a trailing `/` is tolerated and trimmed)
pub fn validate_prefix(prefix: &str) -> Result<&str, StoreError> {
    let trimmed = prefix.strip_suffix('/').unwrap_or(prefix);
    validate_key(trimmed)?;
    Ok(trimmed)
}

/// Whether an id may be embedded as a single key component
///
/// Ids arriving from URL paths become document key components, so the rule
/// is stricter than [`validate_key`]: 1-64 chars of lowercase alphanumeric
/// plus `-` and `_`.
pub fn is_valid_slug(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
