//! Per-link, per-day click counters and their aggregated read model.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cumulative click count for one link on one calendar day.
///
/// At most one row exists per `(link_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickStat {
    pub id: i64,
    pub link_id: i64,
    pub date: NaiveDate,
    pub clicks: i64,
}

impl ClickStat {
    /// Creates a new ClickStat instance.
    pub fn new(id: i64, link_id: i64, date: NaiveDate, clicks: i64) -> Self {
        Self {
            id,
            link_id,
            date,
            clicks,
        }
    }

    /// Counts one more click.
    pub fn increment(&mut self) {
        self.clicks += 1;
    }
}

/// Input data for the first click of a `(link_id, date)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClickStat {
    pub link_id: i64,
    pub date: NaiveDate,
    pub clicks: i64,
}

impl NewClickStat {
    /// A counter row holding a single click.
    pub fn first_click(link_id: i64, date: NaiveDate) -> Self {
        Self {
            link_id,
            date,
            clicks: 1,
        }
    }
}

/// Calendar granularity for aggregated statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    Month,
}

impl GroupBy {
    /// PostgreSQL `to_char` pattern producing the period label.
    pub fn date_format(self) -> &'static str {
        match self {
            GroupBy::Day => "YYYY-MM-DD",
            GroupBy::Month => "YYYY-MM",
        }
    }

    /// Formats `date` as the label of the period containing it.
    pub fn period_of(self, date: NaiveDate) -> String {
        match self {
            GroupBy::Day => date.format("%Y-%m-%d").to_string(),
            GroupBy::Month => date.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupBy::Day => f.write_str("day"),
            GroupBy::Month => f.write_str("month"),
        }
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(GroupBy::Day),
            "month" => Ok(GroupBy::Month),
            other => Err(format!("unknown grouping '{other}', expected 'day' or 'month'")),
        }
    }
}

/// Total clicks across all links for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStat {
    pub period: String,
    pub sum: i64,
}

impl PeriodStat {
    pub fn new(period: impl Into<String>, sum: i64) -> Self {
        Self {
            period: period.into(),
            sum,
        }
    }
}
