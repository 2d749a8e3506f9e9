//! Property-based tests for document key validation
//!
//! Show and artist ids come straight from URL path segments and end up as
//! document key components, so the accepted sets must never contain a path
//! that could escape the store root, whatever a client sends.

use std::path::{Component, Path};

use proptest::prelude::*;

use stagelink::backend::store::{is_valid_slug, validate_key, validate_prefix};

proptest! {
    #[test]
    fn test_accepted_keys_never_escape(key in ".*") {
        if validate_key(&key).is_ok() {
            // std::path is the independent oracle: an accepted key must
            // parse into plain normal components only
            prop_assert!(Path::new(&key)
                .components()
                .all(|c| matches!(c, Component::Normal(_))));
            prop_assert!(!key.contains('\\'));
        }
    }

    #[test]
    fn test_path_shaped_keys_keep_their_segments(
        parts in prop::collection::vec("[a-z0-9._-]{0,6}", 1..6)
    ) {
        let key = parts.join("/");
        if validate_key(&key).is_ok() {
            // no segment collapsed away, so the file lands exactly where
            // the key says
            let components = Path::new(&key).components().count();
            prop_assert_eq!(components, key.split('/').count());
        }
    }

    #[test]
    fn test_valid_slugs_embed_into_valid_keys(slug in "[a-z0-9_-]{1,64}") {
        prop_assert!(is_valid_slug(&slug));
        let show_key = format!("shows/{}/meta.json", slug);
        let artist_key = format!("artists/{}/profile.json", slug);
        prop_assert!(validate_key(&show_key).is_ok());
        prop_assert!(validate_key(&artist_key).is_ok());
    }

    #[test]
    fn test_slug_accepts_exactly_its_alphabet(s in ".*") {
        let in_alphabet = !s.is_empty()
            && s.len() <= 64
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        prop_assert_eq!(is_valid_slug(&s), in_alphabet);
    }

    #[test]
    fn test_prefix_trailing_slash_is_cosmetic(
        prefix in "[a-z0-9_-]{1,10}(/[a-z0-9_-]{1,10}){0,3}"
    ) {
        let with = validate_prefix(&format!("{}/", prefix)).map(str::to_string);
        let without = validate_prefix(&prefix).map(str::to_string);
        prop_assert_eq!(with.ok(), without.ok());
    }
}
