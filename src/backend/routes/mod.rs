//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! The routes module is organized into focused submodules:
//!
//! - **`router`** - Main router creation and middleware assembly
//! - **`api_routes`** - REST endpoints (auth, shows, artists)
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports and documentation
//! ├── router.rs     - Main router creation
//! └── api_routes.rs - REST endpoint wiring
//! ```
//!
//! # Route Types
//!
//! ## Auth Routes
//!
//! - `POST /api/auth/login` - Exchange credentials for a session cookie
//! - `POST /api/auth/logout` - Clear the session cookie
//! - `GET /api/auth/me` - Echo the verified session
//!
//! ## Show Routes
//!
//! - `GET /api/shows` - Show index
//! - `GET|PUT /api/shows/{show_id}` - Show metadata
//! - `GET|PUT /api/shows/{show_id}/running-order` - Running order
//! - `GET|PUT|DELETE /api/shows/{show_id}/alert` - Emergency alert
//! - `GET /api/shows/{show_id}/alert/history` - Alert log
//!
//! ## Artist Routes
//!
//! - `GET /api/artists` - Roster index
//! - `GET|PUT /api/artists/{artist_id}` - Artist profile
//!
//! ## Realtime
//!
//! - `GET /ws/shows/{show_id}` - The show WebSocket
//!
//! Everything else passes through the access gate and lands in the static
//! file service or the 404 fallback.

/// Main router creation
pub mod router;

/// REST endpoint wiring
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
