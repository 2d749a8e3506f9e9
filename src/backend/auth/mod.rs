//! Authentication Module
//!
//! Session tokens, the access gate, and the staff directory. Together they
//! decide who a request belongs to and whether it may pass.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`tokens`** - Session token issuing and verification
//! - **`gate`** - Route protection and the `AuthSession` extractor
//! - **`staff`** - Staff directory records over the document store
//! - **`handlers`** - HTTP handlers for login/logout/me
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs      - Module exports and documentation
//! ├── tokens.rs   - TokenService, SessionClaims, TokenError
//! ├── gate.rs     - Access gate middleware, cookie helpers, AuthSession
//! ├── staff.rs    - StaffRecord and directory lookups
//! └── handlers/   - HTTP handlers
//!     ├── mod.rs
//!     ├── types.rs
//!     ├── login.rs
//!     ├── logout.rs
//!     └── me.rs
//! ```
//!
//! # Session Flow
//!
//! 1. **Login**: access key checked against the staff directory → token
//!    issued → session cookie installed
//! 2. **Page request**: gate reads the cookie, verifies, applies role rules
//! 3. **API request**: `AuthSession` extractor reads the cookie and answers
//!    401 on failure
//! 4. **Socket**: the same cookie rides the upgrade request for ambient
//!    authentication; the handshake frame covers clients without it
//!
//! # Security
//!
//! - Access keys are bcrypt-hashed in the staff directory
//! - Tokens are signed, expiring, and stateless; there is no revocation
//! - Token rejections are logged by kind but answered uniformly

/// Session token issuing and verification
pub mod tokens;

/// Access gate and session extraction
pub mod gate;

/// Staff directory over the document store
pub mod staff;

/// HTTP handlers for the session lifecycle
pub mod handlers;

// Re-export commonly used types and handlers
pub use gate::{access_gate, AuthSession};
pub use handlers::{get_me, login, logout};
pub use staff::StaffRecord;
pub use tokens::{SessionClaims, TokenError, TokenService};
