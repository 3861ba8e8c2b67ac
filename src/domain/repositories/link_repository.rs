//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the hash is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by hash, soft-deleted links included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, AppError>;

    /// Lists live links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Link>, AppError>;

    /// Counts live links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Applies `patch` to a live link and bumps `updated_at`.
    ///
    /// Returns `Ok(None)` when no live link has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new hash is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Option<Link>, AppError>;

    /// Soft-deletes a link by setting `deleted_at = now()`.
    ///
    /// Returns `Ok(true)` if a live link was deleted, `Ok(false)` if it was
    /// not found or already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;
}
