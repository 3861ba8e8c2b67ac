//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping
//! - [`ClickStat`] - Per-day click counter for one link
//! - [`PeriodStat`] - Clicks summed over all links for one day or month
//!
//! Separate `New*` structs are used for records that do not exist in storage yet,
//! and [`LinkPatch`] for partial updates.

pub mod click_stat;
pub mod link;

pub use click_stat::{ClickStat, GroupBy, NewClickStat, PeriodStat};
pub use link::{Link, LinkPatch, NewLink};
