//! Server Module
//!
//! Startup wiring: configuration, shared state and application assembly.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── config.rs - Environment-driven startup configuration
//! ├── state.rs  - AppState and FromRef extraction
//! └── init.rs   - Application assembly
//! ```

/// Environment-driven startup configuration
pub mod config;

/// Application assembly
pub mod init;

/// Shared application state
pub mod state;

// Re-export commonly used types and functions
pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
