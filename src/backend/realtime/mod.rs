//! Realtime Module
//!
//! Fan-out of state changes to connected browsers. Every client holds one
//! WebSocket scoped to a show; every completed write is re-broadcast to that
//! show's connections as a full snapshot, so a client never has to merge
//! deltas.
//!
//! # Architecture
//!
//! The realtime module is organized into focused submodules:
//!
//! - **`hub`** - Connection registry and scope-indexed broadcast
//! - **`socket`** - WebSocket handshake, frame loop and teardown
//! - **`notify`** - Change notification glue between handlers and the hub
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs    - Module exports and documentation
//! ├── hub.rs    - Connection registry and broadcast
//! ├── socket.rs - Per-connection lifecycle
//! └── notify.rs - Write-then-broadcast glue
//! ```
//!
//! # Delivery Model
//!
//! Broadcasts are fire-and-forget: a connection that cannot accept a frame
//! is unregistered and delivery continues to the rest. Clients that miss
//! frames catch up by requesting fresh snapshots after reconnecting.

/// Connection registry and scope-indexed broadcast
pub mod hub;

/// Write-then-broadcast glue
pub mod notify;

/// Per-connection WebSocket lifecycle
pub mod socket;

// Re-export commonly used types and functions
pub use hub::{BroadcastHub, ConnectionId, OutboundSender};
pub use notify::ChangeNotifier;
pub use socket::show_socket;
