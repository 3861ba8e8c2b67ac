//! Repository trait for per-day click counters.

use crate::domain::entities::{ClickStat, GroupBy, NewClickStat, PeriodStat};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository interface for [`ClickStat`] rows.
///
/// Rows are written only by [`crate::domain::stat_aggregator::StatAggregator`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Finds the counter for `(link_id, date)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(&self, link_id: i64, date: NaiveDate) -> Result<Option<ClickStat>, AppError>;

    /// Inserts the first counter row for a `(link_id, date)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the row already exists.
    /// Returns [`AppError::Internal`] on database errors, including a link
    /// that no longer exists.
    async fn create(&self, new_stat: NewClickStat) -> Result<ClickStat, AppError>;

    /// Persists the click count of an existing row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn save(&self, stat: &ClickStat) -> Result<(), AppError>;

    /// Sums clicks over all links per day or month for dates in `[from, to]`.
    ///
    /// Periods without rows are absent. Ordered by period ascending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn aggregate(
        &self,
        group_by: GroupBy,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PeriodStat>, AppError>;
}
