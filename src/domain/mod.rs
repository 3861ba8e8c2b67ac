//! Domain layer: entities, repository contracts and the click-tracking pipeline.
//!
//! # Modules
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`event`] - Typed domain events
//! - [`event_bus`] - In-process publish/subscribe channel
//! - [`click_publisher`] - Detached `LinkVisited` emission from the redirect path
//! - [`stat_aggregator`] - Background consumer maintaining per-day click counters
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves a hash and returns `307` right away
//! 2. [`click_publisher::ClickPublisher`] publishes [`event::Event::LinkVisited`] on a detached task
//! 3. [`event_bus::EventBus`] hands the event to every subscriber queue
//! 4. [`stat_aggregator::StatAggregator`] upserts the `(link, day)` counter via
//!    [`repositories::StatsRepository`]

pub mod click_publisher;
pub mod entities;
pub mod event;
pub mod event_bus;
pub mod repositories;
pub mod stat_aggregator;
