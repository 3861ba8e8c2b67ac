//! Background consumer turning click events into per-day counters.

use std::sync::Arc;

use chrono::NaiveDate;
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use super::entities::{ClickStat, NewClickStat};
use super::event::Event;
use super::event_bus::{EventBus, Subscription};
use super::repositories::StatsRepository;
use crate::error::AppError;

/// Single long-lived worker that folds [`Event::LinkVisited`] into
/// [`ClickStat`] rows.
///
/// It is the only writer of `click_stats`. Events are handled one at a time,
/// so the read-then-write upsert below cannot lose increments. Running more
/// than one aggregator would require an atomic insert-or-increment in storage.
///
/// Failures never leave the worker: a malformed event or a storage error is
/// logged, the click is dropped and the loop continues. There is no retry.
pub struct StatAggregator {
    subscription: Subscription,
    repository: Arc<dyn StatsRepository>,
}

impl StatAggregator {
    /// Subscribes to `bus`. Call exactly once per process.
    pub fn new(bus: &EventBus, repository: Arc<dyn StatsRepository>) -> Self {
        Self {
            subscription: bus.subscribe(),
            repository,
        }
    }

    /// Processes events until the bus goes away.
    ///
    /// There is no shutdown signal; in practice this runs for the lifetime of
    /// the process.
    pub async fn run(mut self) {
        tracing::info!("Stat aggregator started");

        while let Some(event) = self.subscription.next().await {
            self.handle(event).await;
        }

        tracing::warn!("Event bus closed, stat aggregator stopped");
    }

    /// Handles a single event.
    pub async fn handle(&self, event: Event) {
        match event {
            Event::LinkVisited {
                link_id,
                visited_at,
            } => {
                if link_id <= 0 {
                    tracing::error!(link_id, "Malformed LinkVisited event, skipped");
                    metrics::counter!("click_events_rejected_total").increment(1);
                    return;
                }

                let date = visited_at.date_naive();
                match self.add_click(link_id, date).await {
                    Ok(stat) => {
                        tracing::debug!(link_id, %date, clicks = stat.clicks, "Click recorded");
                        metrics::counter!("clicks_recorded_total").increment(1);
                    }
                    Err(e) => {
                        tracing::error!(link_id, %date, error = %e, "Failed to record click, dropped");
                        metrics::counter!("click_events_failed_total").increment(1);
                    }
                }
            }
        }
    }

    /// Counts one click for `(link_id, date)`: creates the row with 1 on the
    /// first click of the day, otherwise increments and saves it.
    async fn add_click(&self, link_id: i64, date: NaiveDate) -> Result<ClickStat, AppError> {
        match self.repository.find(link_id, date).await? {
            Some(mut stat) => {
                stat.increment();
                self.repository.save(&stat).await?;
                Ok(stat)
            }
            None => {
                self.repository
                    .create(NewClickStat::first_click(link_id, date))
                    .await
            }
        }
    }
}

/// Subscribes a [`StatAggregator`] to `bus` and runs it on a dedicated task.
pub fn spawn_stat_aggregator(
    bus: &EventBus,
    repository: Arc<dyn StatsRepository>,
) -> JoinHandle<()> {
    let aggregator = StatAggregator::new(bus, repository);
    tokio::spawn(aggregator.run())
}
