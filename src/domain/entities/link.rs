//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

use crate::utils::hash_generator::generate_hash;

/// A stored short link.
///
/// `hash` is unique across every stored row, including soft-deleted ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        url: String,
        hash: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            url,
            hash,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A link that has not been persisted yet.
///
/// Constructed with a freshly generated hash; the creation path calls
/// [`NewLink::regenerate_hash`] until the hash is not owned by any stored link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url: String,
    pub hash: String,
}

impl NewLink {
    /// Builds a new link for `url` with a random short hash.
    ///
    /// The URL is expected to be validated by the caller.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            hash: generate_hash(),
        }
    }

    /// Replaces the hash with a freshly generated one and returns it.
    pub fn regenerate_hash(&mut self) -> &str {
        self.hash = generate_hash();
        &self.hash
    }
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub url: Option<String>,
    pub hash: Option<String>,
}

impl LinkPatch {
    /// Returns true when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hash_generator::HASH_LENGTH;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "https://example.com".to_string(),
            "abcd1234".to_string(),
            now,
            now,
            None,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.url, "https://example.com");
        assert_eq!(link.hash, "abcd1234");
        assert_eq!(link.created_at, now);
        assert!(!link.is_deleted());
    }

    #[test]
    fn test_link_is_deleted() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "https://example.com".to_string(),
            "abcd1234".to_string(),
            now,
            now,
            Some(now),
        );
        assert!(link.is_deleted());
    }

    #[test]
    fn test_new_link_has_generated_hash() {
        let new_link = NewLink::new("https://rust-lang.org");

        assert_eq!(new_link.url, "https://rust-lang.org");
        assert_eq!(new_link.hash.len(), HASH_LENGTH);
        assert!(new_link.hash.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_regenerate_hash_replaces_value() {
        let mut new_link = NewLink::new("https://rust-lang.org");
        let before = new_link.hash.clone();

        let after = new_link.regenerate_hash().to_string();

        assert_eq!(after, new_link.hash);
        assert_eq!(after.len(), HASH_LENGTH);
        assert_ne!(before, after);
        assert_eq!(new_link.url, "https://rust-lang.org");
    }

    #[test]
    fn test_link_patch_is_empty() {
        assert!(LinkPatch::default().is_empty());
        assert!(
            !LinkPatch {
                url: Some("https://a.com".to_string()),
                hash: None
            }
            .is_empty()
        );
    }
}
