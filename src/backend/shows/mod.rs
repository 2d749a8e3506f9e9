//! Shows Module
//!
//! The show is the unit of coordination: one live production with its own
//! scope, running order and alert state. Handlers here are thin transforms,
//! each one a document-store read or write followed by a broadcast to the
//! show's scope.
//!
//! # Module Structure
//!
//! ```text
//! shows/
//! ├── mod.rs           - Document keys, show id rules, module exports
//! ├── handlers.rs      - Show index and metadata handlers
//! ├── running_order.rs - Running order handlers
//! └── alerts.rs        - Emergency alert handlers
//! ```
//!
//! # Document Layout
//!
//! ```text
//! shows/index.json                    - show summaries
//! shows/<id>/meta.json                - one show's metadata
//! shows/<id>/running_order.json       - ordered performance slots
//! shows/<id>/alerts/active.json       - the active alert, or null
//! shows/<id>/alerts/log/<stamp>.json  - append-only alert history
//! ```

/// Show index and metadata handlers
pub mod handlers;

/// Running order handlers
pub mod running_order;

/// Emergency alert handlers
pub mod alerts;

pub use handlers::{get_show, list_shows, put_show};

/// Document key of the show index
pub const SHOW_INDEX_KEY: &str = "shows/index.json";

/// Show ids are URL path segments and document key components at once
pub fn is_valid_show_id(id: &str) -> bool {
    crate::backend::store::is_valid_slug(id)
}

/// Key of one show's metadata document
pub fn meta_key(show_id: &str) -> String {
    format!("shows/{}/meta.json", show_id)
}

/// Key of one show's running order document
pub fn running_order_key(show_id: &str) -> String {
    format!("shows/{}/running_order.json", show_id)
}

/// Key of one show's active alert document
pub fn active_alert_key(show_id: &str) -> String {
    format!("shows/{}/alerts/active.json", show_id)
}

/// Listing prefix of one show's alert history
pub fn alert_log_prefix(show_id: &str) -> String {
    format!("shows/{}/alerts/log", show_id)
}

/// Key of one alert history entry
pub fn alert_log_key(show_id: &str, stamp: &str) -> String {
    format!("shows/{}/alerts/log/{}.json", show_id, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::validate_key;

    #[test]
    fn test_show_id_slugs() {
        assert!(is_valid_show_id("summer-fest-2026"));
        assert!(is_valid_show_id("gala_9"));
        assert!(!is_valid_show_id(""));
        assert!(!is_valid_show_id("Summer Fest"));
        assert!(!is_valid_show_id("fest/2026"));
        assert!(!is_valid_show_id("../etc"));
        assert!(!is_valid_show_id(&"x".repeat(65)));
    }

    #[test]
    fn test_keys_are_valid_store_keys() {
        for key in [
            meta_key("summer-fest"),
            running_order_key("summer-fest"),
            active_alert_key("summer-fest"),
            alert_log_key("summer-fest", "20260301T200000Z"),
            SHOW_INDEX_KEY.to_string(),
        ] {
            assert!(validate_key(&key).is_ok(), "bad key: {key}");
        }
    }
}
