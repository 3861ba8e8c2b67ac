//! Read-side queries over aggregated click counters.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::entities::{GroupBy, PeriodStat};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Answers "how many clicks per day/month" over a date range.
///
/// Pure read path: safe to call concurrently with itself and with the
/// [`crate::domain::stat_aggregator::StatAggregator`] writing counters.
pub struct StatsService {
    repository: Arc<dyn StatsRepository>,
}

impl StatsService {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<dyn StatsRepository>) -> Self {
        Self { repository }
    }

    /// Clicks summed over all links, grouped by `group_by`, for dates in
    /// `[from, to]` (both inclusive), ordered by period ascending.
    ///
    /// Days or months without any recorded click are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `from` is after `to`.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_all(
        &self,
        group_by: GroupBy,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PeriodStat>, AppError> {
        if from > to {
            return Err(AppError::bad_request(
                "'from' must not be after 'to'",
                json!({ "from": from, "to": to }),
            ));
        }

        self.repository.aggregate(group_by, from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockStatsRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_get_all_by_day() {
        let mut mock_repo = MockStatsRepository::new();

        mock_repo
            .expect_aggregate()
            .withf(|by, from, to| {
                *by == GroupBy::Day && *from == date(2024, 1, 1) && *to == date(2024, 1, 3)
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    PeriodStat::new("2024-01-01", 3),
                    PeriodStat::new("2024-01-03", 5),
                ])
            });

        let service = StatsService::new(Arc::new(mock_repo));

        let stats = service
            .get_all(GroupBy::Day, date(2024, 1, 1), date(2024, 1, 3))
            .await
            .unwrap();

        assert_eq!(
            stats,
            vec![
                PeriodStat::new("2024-01-01", 3),
                PeriodStat::new("2024-01-03", 5)
            ]
        );
    }

    #[tokio::test]
    async fn test_get_all_single_day_range() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_aggregate()
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let service = StatsService::new(Arc::new(mock_repo));

        let stats = service
            .get_all(GroupBy::Month, date(2024, 2, 1), date(2024, 2, 1))
            .await
            .unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_rejects_inverted_range() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo.expect_aggregate().times(0);

        let service = StatsService::new(Arc::new(mock_repo));

        let result = service
            .get_all(GroupBy::Day, date(2024, 1, 3), date(2024, 1, 1))
            .await;
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }
}
