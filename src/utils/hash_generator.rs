//! Short hash generation and validation.
//!
//! Generated hashes are 8 characters drawn from the base62 alphabet
//! (`A-Z`, `a-z`, `0-9`) and carry no information about the target URL.
//! Uniqueness is not checked here; see
//! [`crate::application::services::LinkService::create_link`].

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of a generated short hash.
pub const HASH_LENGTH: usize = 8;

/// Bounds for user-chosen hashes set through link updates.
const MIN_CUSTOM_HASH_LENGTH: usize = 4;
const MAX_CUSTOM_HASH_LENGTH: usize = 32;

/// Hashes that would shadow a top-level route.
const RESERVED_HASHES: &[&str] = &["link", "stat", "health"];

static CUSTOM_HASH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Generates a random base62 short hash of [`HASH_LENGTH`] characters.
///
/// ```ignore
/// let hash = generate_hash();
/// assert_eq!(hash.len(), 8);
/// assert!(hash.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_hash() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(HASH_LENGTH)
        .map(char::from)
        .collect()
}

/// Validates a hash supplied by a client when updating a link.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_hash(hash: &str) -> Result<(), AppError> {
    if !(MIN_CUSTOM_HASH_LENGTH..=MAX_CUSTOM_HASH_LENGTH).contains(&hash.len()) {
        return Err(AppError::bad_request(
            "Hash must be 4-32 characters",
            json!({ "provided_length": hash.len() }),
        ));
    }

    if !CUSTOM_HASH_REGEX.is_match(hash) {
        return Err(AppError::bad_request(
            "Hash can only contain letters, digits, '-' and '_'",
            json!({ "hash": hash }),
        ));
    }

    if RESERVED_HASHES.contains(&hash) {
        return Err(AppError::bad_request(
            "This hash is reserved",
            json!({ "hash": hash }),
        ));
    }

    Ok(())
}
