//! Repository trait for API token authentication.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Stored API token. Only the HMAC of the raw token is kept.
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Repository interface for API token management.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Returns true if a non-revoked token with this hash exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn is_active(&self, token_hash: &str) -> Result<bool, AppError>;

    /// Sets `last_used_at = now()` for the token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn mark_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Stores a new token hash under a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name or hash is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError>;

    /// Lists all tokens, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<ApiToken>, AppError>;

    /// Finds a token by numeric id or, failing that, by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(&self, name_or_id: &str) -> Result<Option<ApiToken>, AppError>;

    /// Revokes a token. Returns `Ok(false)` if it was missing or already revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn revoke(&self, id: i64) -> Result<bool, AppError>;
}
