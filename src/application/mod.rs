//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls and validation and give HTTP handlers
//! a narrow API.
//!
//! - [`services::link_service::LinkService`] - Link creation with hash collision retry, lookup, edit, delete
//! - [`services::stats_service::StatsService`] - Aggregated click statistics by day or month
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
