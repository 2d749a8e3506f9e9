//! Authentication Handlers Module
//!
//! HTTP handlers for the session lifecycle. Login verifies an access key
//! against the staff directory and installs the session cookie; logout
//! clears it; `me` echoes the verified session.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs    - Module exports and documentation
//! ├── types.rs  - Request and response types
//! ├── login.rs  - Login handler (issues the session cookie)
//! ├── logout.rs - Logout handler (clears the session cookie)
//! └── me.rs     - Current session handler
//! ```
//!
//! # Handlers
//!
//! - **`login`** - POST /api/auth/login
//! - **`logout`** - POST /api/auth/logout
//! - **`get_me`** - GET /api/auth/me
//!
//! # Security
//!
//! - Access keys are verified against bcrypt hashes in the staff directory
//! - Unknown usernames and wrong keys answer identically (no enumeration)
//! - The session cookie is HTTP-only; logout is purely client-side cookie
//!   removal, there is no server-side revocation

/// Request and response types
pub mod types;

/// Login handler
pub mod login;

/// Logout handler
pub mod logout;

/// Current session handler
pub mod me;

// Re-export commonly used types
pub use types::{AckResponse, LoginRequest, LoginResponse};

// Re-export handlers
pub use login::login;
pub use logout::logout;
pub use me::get_me;
