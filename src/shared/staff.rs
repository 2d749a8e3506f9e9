//! Public staff identity
//!
//! The subset of a staff record that is safe to hand to clients: login
//! responses, `/api/auth/me`, and the client channel all carry this shape.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::roles::Role;

/// Public view of one staff member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffProfile {
    /// Stable staff id (the token subject)
    pub id: Uuid,
    /// Display name shown to other staff
    pub name: String,
    /// Role used by the access gate
    pub role: Role,
}

impl StaffProfile {
    pub fn new(id: Uuid, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }
}
