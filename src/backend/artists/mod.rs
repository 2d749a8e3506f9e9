//! Artists Module
//!
//! Artist profiles and the roster index. Profiles are free-form documents;
//! the roster is a derived index of summaries that the profile writer
//! refreshes best-effort after every profile write.
//!
//! # Module Structure
//!
//! ```text
//! artists/
//! ├── mod.rs      - Document keys, artist id rules, module exports
//! └── handlers.rs - Roster and profile handlers
//! ```
//!
//! # Document Layout
//!
//! ```text
//! artists/index.json         - roster of artist summaries
//! artists/<id>/profile.json  - one artist's profile
//! ```

/// Roster and profile handlers
pub mod handlers;

pub use handlers::{get_artist, list_artists, put_artist};

/// Document key of the roster index
pub const ROSTER_KEY: &str = "artists/index.json";

/// Artist ids follow the same slug rule as show ids
pub fn is_valid_artist_id(id: &str) -> bool {
    crate::backend::store::is_valid_slug(id)
}

/// Key of one artist's profile document
pub fn profile_key(artist_id: &str) -> String {
    format!("artists/{}/profile.json", artist_id)
}
