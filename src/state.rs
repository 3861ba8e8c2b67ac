//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, StatsService};
use crate::domain::click_publisher::ClickPublisher;
use crate::domain::event_bus::EventBus;
use crate::domain::repositories::{LinkRepository, StatsRepository, TokenRepository};

/// Services and event plumbing shared by all requests.
///
/// Cheap to clone: everything is behind `Arc` or is itself a shared handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
    pub click_publisher: ClickPublisher,
    /// The process-wide bus, kept for health reporting.
    pub event_bus: EventBus,
    /// Scheme and host prepended to hashes, without a trailing slash.
    pub base_url: String,
}

impl AppState {
    /// Wires services over the given repositories and the single `event_bus`.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        stats_repository: Arc<dyn StatsRepository>,
        token_repository: Arc<dyn TokenRepository>,
        event_bus: EventBus,
        base_url: impl Into<String>,
        token_signing_secret: impl Into<String>,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(link_repository)),
            stats_service: Arc::new(StatsService::new(stats_repository)),
            auth_service: Arc::new(AuthService::new(
                token_repository,
                token_signing_secret.into(),
            )),
            click_publisher: ClickPublisher::new(event_bus.clone()),
            event_bus,
            base_url: base_url.into(),
        }
    }

    /// Full short URL for `hash`.
    pub fn short_url(&self, hash: &str) -> String {
        format!("{}/{}", self.base_url, hash)
    }
}
