//! Backend Module
//!
//! This module contains all server-side code for the Stagelink coordination
//! layer. It provides a complete Axum HTTP server with a show-scoped
//! WebSocket fan-out, a path-addressed document store, and cookie-based
//! session authentication.
//!
//! # Overview
//!
//! The backend module includes:
//! - Axum HTTP server setup and configuration
//! - The document store (filesystem and in-memory backends)
//! - Session token issue/verify and the route access gate
//! - The broadcast hub and per-connection socket lifecycle
//! - Thin CRUD surfaces for shows, running orders, alerts and artists
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`store`** - Path-addressed JSON document storage
//! - **`auth`** - Session tokens, staff directory, access gate
//! - **`realtime`** - Broadcast hub and WebSocket lifecycle
//! - **`shows`** - Show metadata, running order, emergency alerts
//! - **`artists`** - Artist profiles and the roster index
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs      - Module exports and documentation
//! ├── main.rs     - Server binary entry point
//! ├── server/     - Server initialization and state
//! ├── routes/     - Route configuration
//! ├── store/      - Document storage
//! ├── auth/       - Authentication
//! ├── realtime/   - Broadcast hub and sockets
//! ├── shows/      - Show-scoped documents
//! ├── artists/    - Artist documents
//! └── error/      - Error types
//! ```
//!
//! # State Management
//!
//! The backend shares one `AppState` across handlers: the document store
//! behind `Arc<dyn DocumentStore>`, the broadcast hub behind an `Arc`, the
//! change notifier, the token service and the startup configuration. The
//! hub guards its registry with a `Mutex` and never holds the lock across
//! an await point.
//!
//! # Change Flow
//!
//! Every mutation follows write-then-broadcast: the document store write
//! completes first, then the full new value fans out to the show's
//! connections. Readers that miss a frame re-request a snapshot; nothing
//! is queued for absent clients.

/// Artist profiles and roster
pub mod artists;

/// Session tokens, staff directory, access gate
pub mod auth;

/// Backend error types
pub mod error;

/// Broadcast hub and WebSocket lifecycle
pub mod realtime;

/// HTTP route configuration
pub mod routes;

/// Server initialization and state
pub mod server;

/// Show metadata, running order, emergency alerts
pub mod shows;

/// Path-addressed JSON document storage
pub mod store;
