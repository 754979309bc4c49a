//! Read-only access to recorded telemetry.

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{Event, TimedEvent};

/// Source of recorded events.
///
/// Both queries return the records whose timestamp lies in `[begin, end)`,
/// ordered by ascending timestamp.
pub trait EventStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn query_events(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, Self::Error>;

    fn query_timed_events(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimedEvent>, Self::Error>;
}

/// Serialized form of an event dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventLog {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub timed_events: Vec<TimedEvent>,
}

/// In-memory [`EventStore`] kept sorted by timestamp.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    events: Vec<Event>,
    timed_events: Vec<TimedEvent>,
}

impl MemoryEventStore {
    #[must_use]
    pub fn new(mut events: Vec<Event>, mut timed_events: Vec<TimedEvent>) -> Self {
        // stable: records with equal timestamps keep insertion order
        events.sort_by_key(|e| e.timestamp);
        timed_events.sort_by_key(|e| e.info.timestamp);
        Self {
            events,
            timed_events,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len() + self.timed_events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<EventLog> for MemoryEventStore {
    fn from(log: EventLog) -> Self {
        Self::new(log.events, log.timed_events)
    }
}

fn in_range<T>(
    records: &[T],
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    timestamp: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T>
where
    T: Clone,
{
    let start = records.partition_point(|r| timestamp(r) < begin);
    let stop = records.partition_point(|r| timestamp(r) < end);
    records[start..stop.max(start)].to_vec()
}

impl EventStore for MemoryEventStore {
    type Error = Infallible;

    fn query_events(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, Self::Error> {
        Ok(in_range(&self.events, begin, end, |e| e.timestamp))
    }

    fn query_timed_events(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimedEvent>, Self::Error> {
        Ok(in_range(&self.timed_events, begin, end, |e| e.info.timestamp))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone as _;

    use super::*;
    use crate::event::{GAME_FEATURE_CONSUMED, LEVEL_DURATION};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 2, day, 0, 0, 0).unwrap()
    }

    fn store() -> MemoryEventStore {
        let events = vec![
            Event::new("b", GAME_FEATURE_CONSUMED, at(3)),
            Event::new("a", GAME_FEATURE_CONSUMED, at(1)),
            Event::new("c", GAME_FEATURE_CONSUMED, at(3)),
            Event::new("d", GAME_FEATURE_CONSUMED, at(5)),
        ];
        let timed = vec![
            TimedEvent::new(Event::new("a", LEVEL_DURATION, at(4)), Duration::from_secs(60)),
            TimedEvent::new(Event::new("a", LEVEL_DURATION, at(2)), Duration::from_secs(30)),
        ];
        MemoryEventStore::new(events, timed)
    }

    #[test]
    fn test_query_is_half_open_and_sorted() {
        let store = store();
        let players = store
            .query_events(at(1), at(5))
            .unwrap()
            .into_iter()
            .map(|e| e.player)
            .collect::<Vec<_>>();
        assert_eq!(players, vec!["a", "b", "c"]);

        let timed = store.query_timed_events(at(1), at(5)).unwrap();
        assert_eq!(timed[0].duration, Duration::from_secs(30));
        assert_eq!(timed[1].duration, Duration::from_secs(60));
    }

    #[test]
    fn test_query_outside_range() {
        let store = store();
        assert!(store.query_events(at(6), at(9)).unwrap().is_empty());
        assert!(store.query_events(at(3), at(1)).unwrap().is_empty());
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_load_event_log() {
        let json = r#"{
            "events": [
                {
                    "player": "p-1",
                    "version": "1.0",
                    "action": "Game Progression",
                    "timestamp": "2014-02-01T10:00:00Z",
                    "parameters": [{ "key": "Increase", "value": "3" }]
                }
            ]
        }"#;
        let log: EventLog = serde_json::from_str(json).unwrap();
        let store = MemoryEventStore::from(log);
        let events = store.query_events(at(1), at(2)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].parameter("Increase"), Some("3"));
        assert!(store.query_timed_events(at(1), at(2)).unwrap().is_empty());
    }
}
