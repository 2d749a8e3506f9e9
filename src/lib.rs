//! Stagelink - Main Library
//!
//! Stagelink is a realtime coordination layer for live shows: one backstage
//! server that keeps every crew screen on the same running order, stage
//! alerts and artist roster, pushing each change to the affected show's
//! connections the moment it is written.
//!
//! # Overview
//!
//! This library provides the core functionality for Stagelink, including:
//! - A path-addressed JSON document store (filesystem-backed, swappable)
//! - Cookie-borne session tokens and a role-aware access gate
//! - A per-show broadcast hub fanning writes out over WebSockets
//! - REST handlers for shows, running orders, stage alerts and artists
//! - A reconnecting native client channel with a local state cache
//!
//! # Module Structure
//!
//! The library is organized into three main modules:
//!
//! - **`shared`** - Types used on both sides of the wire
//!   - Wire protocol frames and the session cookie name
//!   - Staff roles and the public staff profile
//!   - Error types
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server with the WebSocket show endpoint
//!   - Document store, session tokens, access gate
//!   - Broadcast hub and change notification flow
//!
//! - **`client`** - Native client
//!   - REST companion for login and document access
//!   - Reconnecting show channel with exponential backoff
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use stagelink::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env();
//! let app = create_app(config).await?;
//! // Serve app with axum
//! # Ok(())
//! # }
//! ```
//!
//! ## Native Client
//!
//! ```rust,no_run
//! use stagelink::client::{ApiClient, ChannelConfig, ShowChannel};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut api = ApiClient::new("http://127.0.0.1:3000");
//! api.login("mara", "backstage-pass").await?;
//! let token = api.session_token().unwrap_or_default().to_string();
//!
//! let config = ChannelConfig::new("ws://127.0.0.1:3000", "gala-night", token);
//! let (channel, mut events) = ShowChannel::connect(config);
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! channel.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Writes travel over HTTP, updates come back over WebSockets:
//!
//! 1. A handler validates the request and writes the full new document
//! 2. The change notifier broadcasts the new value to the show's scope
//! 3. Every connection in that scope applies the pushed snapshot locally
//!
//! There is no delta protocol and no cross-document transaction; every
//! update replaces a whole document, which keeps reconnect catch-up to a
//! plain snapshot request.
//!
//! # Thread Safety
//!
//! - **Server**: hub state lives in a mutex-guarded registry; store I/O is
//!   async and unsynchronized (last write wins)
//! - **Client**: the channel driver owns the transport; the handle shares
//!   only lock-guarded state and cache views
//!
//! # Error Handling
//!
//! The library uses Rust's standard error handling:
//!
//! - `Result<T, E>` for fallible operations
//! - `Option<T>` for optional values
//! - Custom error types in `shared::error`, `backend::error` and
//!   `backend::store`

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;

/// Native client (REST companion and reconnecting channel)
pub mod client;
