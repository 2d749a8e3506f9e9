//! Native Client
//!
//! Client-side counterpart to the realtime backend: a reqwest REST companion
//! for login and document access, and a reconnecting WebSocket channel that
//! keeps a local cache in sync with broadcast updates.
//!
//! The split mirrors how the system is used: mutations travel over HTTP,
//! updates come back over the channel. A native tool logs in with
//! [`api::ApiClient`], hands the session token to a [`channel::ShowChannel`],
//! and then watches the event stream while issuing writes over REST.
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs        - Module exports (this file)
//! ├── api.rs        - REST companion (login, fetch, put, delete)
//! ├── backoff.rs    - Deterministic exponential reconnect schedule
//! └── channel.rs    - Reconnecting show channel state machine
//! ```

/// REST companion for session and document access
pub mod api;
/// Reconnect backoff schedule
pub mod backoff;
/// Reconnecting show channel
pub mod channel;

// Re-export commonly used types and functions
pub use api::{ApiClient, ClientError};
pub use backoff::ReconnectPolicy;
pub use channel::{ChannelConfig, ChannelEvent, ChannelState, ShowChannel};
