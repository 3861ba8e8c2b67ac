//! PostgreSQL repository implementations.
//!
//! Queries are bound at runtime with `sqlx::query_as` into `FromRow` row
//! structs, so the crate builds without a live database.
//!
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgStatsRepository`] - Per-day click counters and aggregation
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_link_repository;
pub mod pg_stats_repository;
pub mod pg_token_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_stats_repository::PgStatsRepository;
pub use pg_token_repository::PgTokenRepository;
