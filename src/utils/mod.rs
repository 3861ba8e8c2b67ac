//! Helper functions shared across layers.
//!
//! - [`hash_generator`] - Short hash generation and validation

pub mod hash_generator;
