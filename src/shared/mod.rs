//! Shared Module
//!
//! Types used on both sides of the wire: the server serializes them onto
//! HTTP responses and WebSocket frames, the native client parses them back.
//!
//! # Overview
//!
//! Everything here is platform-agnostic and serde-serializable. The wire
//! protocol lives in `protocol`, the role lattice the access gate checks in
//! `roles`, and the public staff identity in `staff`.

/// Realtime wire protocol frames
pub mod protocol;

/// Staff roles and the role lattice
pub mod roles;

/// Public staff identity
pub mod staff;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use protocol::{ClientCommand, ClientFrame, UpdateMessage, SESSION_COOKIE};
pub use roles::Role;
pub use staff::StaffProfile;
