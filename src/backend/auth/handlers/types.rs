/**
 * Authentication Handler Types
 *
 * Request and response types used by the session handlers.
 */
use serde::{Deserialize, Serialize};

use crate::shared::staff::StaffProfile;

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// Staff login name
    pub username: String,
    /// Access key, verified against the stored bcrypt hash
    pub access_key: String,
}

/// Login response
///
/// The token also rides the Set-Cookie header; it is repeated in the body so
/// non-browser clients (the native channel) can hold it directly.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    /// Session token (also installed as the session cookie)
    pub token: String,
    /// Public profile of the logged-in staff member
    pub staff: StaffProfile,
}

/// Plain acknowledgement body
#[derive(Serialize, Deserialize, Debug)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
