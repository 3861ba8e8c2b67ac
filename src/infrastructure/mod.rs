//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the domain repository traits.
//!
//! - [`persistence`] - PostgreSQL repository implementations

pub mod persistence;
