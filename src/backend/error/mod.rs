//! Backend Error Module
//!
//! Error types for the HTTP surface. Handlers return `Result<_, ApiError>`
//! and propagate with `?`; the error renders itself as a JSON response with
//! the right status code.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions and constructors
//! └── conversion.rs - IntoResponse and From implementations
//! ```
//!
//! # Status Mapping
//!
//! - `Unauthorized` → 401, `Forbidden` → 403, `NotFound` → 404
//! - Store `Unavailable` → 503, store `Corrupt` → 500, store `InvalidKey` → 400
//! - Token verification failures → a uniform 401; the *variant* (malformed,
//!   bad signature, expired) is logged at the rejection site, never sent to
//!   the caller.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::ApiError;
