//! Link creation, lookup and maintenance.

use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::hash_generator::validate_custom_hash;
use serde_json::json;

/// Page of links together with the total number of live links.
#[derive(Debug, Clone)]
pub struct LinkPage {
    pub links: Vec<Link>,
    pub count: i64,
}

/// Service for creating, resolving and editing short links.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self { repository }
    }

    /// Shortens `url` under a freshly generated, unused hash.
    ///
    /// # Collision handling
    ///
    /// A random hash is generated and checked against every stored link,
    /// soft-deleted ones included; on a hit the hash is regenerated and the
    /// check repeated. A concurrent request can still store the same hash
    /// between the check and the insert; the resulting unique violation is
    /// treated as another collision. The loop has no attempt limit: with 62^8
    /// possible hashes a collision is already rare, and a repeat practically
    /// never happens.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_link(&self, url: String) -> Result<Link, AppError> {
        let mut new_link = NewLink::new(url);

        loop {
            if self
                .repository
                .find_by_hash(&new_link.hash)
                .await?
                .is_some()
            {
                tracing::debug!(hash = %new_link.hash, "Hash collision, regenerating");
                new_link.regenerate_hash();
                continue;
            }

            match self.repository.create(new_link.clone()).await {
                Ok(link) => {
                    tracing::info!(link_id = link.id, hash = %link.hash, "Link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!(hash = %new_link.hash, "Hash taken concurrently, regenerating");
                    new_link.regenerate_hash();
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Resolves a hash to a live link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the hash is unknown or its link was deleted.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve(&self, hash: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_hash(hash)
            .await?
            .filter(|link| !link.is_deleted())
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "hash": hash })))
    }

    /// Lists live links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<LinkPage, AppError> {
        let (links, count) =
            tokio::try_join!(self.repository.list(limit, offset), self.repository.count())?;

        Ok(LinkPage { links, count })
    }

    /// Number of live links. Also used as the database health probe.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Changes the target URL and/or hash of a live link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the patch is empty or the hash is invalid.
    /// Returns [`AppError::NotFound`] if no live link has this id.
    /// Returns [`AppError::Conflict`] if the hash belongs to another link.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to update",
                json!({ "fields": ["url", "hash"] }),
            ));
        }

        if let Some(hash) = &patch.hash {
            validate_custom_hash(hash)?;

            if let Some(owner) = self.repository.find_by_hash(hash).await?
                && owner.id != id
            {
                return Err(AppError::conflict(
                    "Hash already in use",
                    json!({ "hash": hash }),
                ));
            }
        }

        self.repository
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Soft-deletes a link. Its hash stays reserved.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link has this id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.soft_delete(id).await? {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        tracing::info!(link_id = id, "Link deleted");
        Ok(())
    }
}
