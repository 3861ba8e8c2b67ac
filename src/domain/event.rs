//! Domain events carried by the [`crate::domain::event_bus::EventBus`].

use chrono::{DateTime, Utc};

/// An in-process domain event.
///
/// Each variant carries its own typed payload, so consumers dispatch with an
/// exhaustive `match`. Events are built at emission time, cloned once per
/// subscriber and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A short link was resolved and the visitor redirected.
    LinkVisited {
        link_id: i64,
        visited_at: DateTime<Utc>,
    },
}

impl Event {
    /// Builds a [`Event::LinkVisited`] stamped with the current time.
    pub fn link_visited(link_id: i64) -> Self {
        Event::LinkVisited {
            link_id,
            visited_at: Utc::now(),
        }
    }

    /// Stable name of the event kind, used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::LinkVisited { .. } => "link_visited",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_visited_constructor() {
        let before = Utc::now();
        let event = Event::link_visited(42);
        let after = Utc::now();

        let Event::LinkVisited {
            link_id,
            visited_at,
        } = event;
        assert_eq!(link_id, 42);
        assert!(visited_at >= before && visited_at <= after);
    }

    #[test]
    fn test_kind() {
        assert_eq!(Event::link_visited(1).kind(), "link_visited");
    }
}
