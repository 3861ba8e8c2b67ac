//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex string. The admin CLI stores tokens
/// with this same function, so both sides must use the same secret.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the MAC cannot be keyed.
pub fn hash_token(signing_secret: &str, token: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|e| AppError::internal("Token hashing failed", json!({ "reason": e.to_string() })))?;
    mac.update(token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Service for authenticating API requests via Bearer tokens.
///
/// A database leak alone does not let an attacker verify or forge tokens:
/// only keyed hashes are stored.
pub struct AuthService {
    repository: Arc<dyn TokenRepository>,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(repository: Arc<dyn TokenRepository>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Authenticates a raw bearer token.
    ///
    /// On success `last_used_at` is refreshed; a failure to do so is logged
    /// and does not reject the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(&self.signing_secret, token)?;

        if !self.repository.is_active(&token_hash).await? {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Invalid or revoked token" }),
            ));
        }

        if let Err(e) = self.repository.mark_used(&token_hash).await {
            tracing::warn!(error = %e, "Failed to update token last_used_at");
        }

        Ok(())
    }
}
