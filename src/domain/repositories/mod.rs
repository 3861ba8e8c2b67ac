//! Repository trait definitions for the domain layer.
//!
//! Traits define the data access contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! with `mockall` for unit tests.
//!
//! - [`LinkRepository`] - Short link CRUD operations
//! - [`StatsRepository`] - Per-day click counters and aggregation
//! - [`TokenRepository`] - API token authentication

pub mod link_repository;
pub mod stats_repository;
pub mod token_repository;

pub use link_repository::LinkRepository;
pub use stats_repository::StatsRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
