//! PostgreSQL implementation of the click counter repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ClickStat, GroupBy, NewClickStat, PeriodStat};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ClickStatRow {
    id: i64,
    link_id: i64,
    date: NaiveDate,
    clicks: i64,
}

impl From<ClickStatRow> for ClickStat {
    fn from(r: ClickStatRow) -> Self {
        ClickStat::new(r.id, r.link_id, r.date, r.clicks)
    }
}

#[derive(sqlx::FromRow)]
struct PeriodRow {
    period: String,
    sum: i64,
}

/// PostgreSQL repository for `click_stats` rows.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn find(&self, link_id: i64, date: NaiveDate) -> Result<Option<ClickStat>, AppError> {
        let row = sqlx::query_as::<_, ClickStatRow>(
            r#"
            SELECT id, link_id, date, clicks
            FROM click_stats
            WHERE link_id = $1 AND date = $2
            "#,
        )
        .bind(link_id)
        .bind(date)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ClickStat::from))
    }

    async fn create(&self, new_stat: NewClickStat) -> Result<ClickStat, AppError> {
        let row = sqlx::query_as::<_, ClickStatRow>(
            r#"
            INSERT INTO click_stats (link_id, date, clicks)
            VALUES ($1, $2, $3)
            RETURNING id, link_id, date, clicks
            "#,
        )
        .bind(new_stat.link_id)
        .bind(new_stat.date)
        .bind(new_stat.clicks)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn save(&self, stat: &ClickStat) -> Result<(), AppError> {
        sqlx::query("UPDATE click_stats SET clicks = $2 WHERE id = $1")
            .bind(stat.id)
            .bind(stat.clicks)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn aggregate(
        &self,
        group_by: GroupBy,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PeriodStat>, AppError> {
        // SUM(bigint) is numeric in PostgreSQL; cast back for decoding.
        let rows = sqlx::query_as::<_, PeriodRow>(
            r#"
            SELECT to_char(date, $1) AS period, SUM(clicks)::BIGINT AS sum
            FROM click_stats
            WHERE date BETWEEN $2 AND $3
            GROUP BY period
            ORDER BY period
            "#,
        )
        .bind(group_by.date_format())
        .bind(from)
        .bind(to)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PeriodStat::new(r.period, r.sum))
            .collect())
    }
}
