//! Staff roles
//!
//! Coarse role model for route protection: a role either satisfies a route's
//! required role or it does not. Coordinators outrank technical staff, who
//! outrank performers; there are no finer-grained permissions.
use serde::{Deserialize, Serialize};

/// Staff role carried in session claims and staff records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Show coordinator: full control of a show
    Coordinator,
    /// Technical staff: sound, light, stage
    Tech,
    /// Performing artist
    Performer,
}

impl Role {
    /// Whether this role meets a route's required role
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Wire/display name, matching the serde representation
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Coordinator => "coordinator",
            Role::Tech => "tech",
            Role::Performer => "performer",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Role::Coordinator => 3,
            Role::Tech => 2,
            Role::Performer => 1,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
