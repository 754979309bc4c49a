//! Typed telemetry records as returned by the event store.
//!
//! ```json
//! {
//!   "player": "p-42",
//!   "version": "1.0.3",
//!   "action": "Game Progression",
//!   "timestamp": "2014-02-17T10:00:00Z",
//!   "parameters": [{ "key": "Increase", "value": "2.5" }]
//! }
//! ```
//!
//! A timed event wraps the same record with a duration:
//!
//! ```json
//! { "info": { ... }, "duration": { "secs": 420, "nanos": 0 } }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const GAME_FEATURE_CONSUMED: &str = "Game Feature Consumed";
pub const SOCIAL_FEATURE_CONSUMED: &str = "Social Feature Consumed";
pub const GAME_PROGRESSION: &str = "Game Progression";
pub const TUTORIAL_DURATION: &str = "Tutorial Duration";
pub const LEVEL_DURATION: &str = "Level Duration";

/// Parameter carrying the progression increment of a [`GAME_PROGRESSION`] event.
pub const INCREASE_PARAMETER: &str = "Increase";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

/// Instantaneous player action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Event {
    pub player: String,
    pub version: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Event {
    #[must_use]
    pub fn new(
        player: impl Into<String>,
        action: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            player: player.into(),
            version: String::new(),
            action: action.into(),
            timestamp,
            parameters: vec![],
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// All values recorded under `key`, in order.
    pub fn parameter_values<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> {
        self.parameters
            .iter()
            .filter(move |p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// First value recorded under `key`.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameter_values(key).next()
    }
}

/// Player action with a measured duration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimedEvent {
    pub info: Event,
    pub duration: Duration,
}

impl TimedEvent {
    #[must_use]
    pub fn new(info: Event, duration: Duration) -> Self {
        Self { info, duration }
    }

    #[must_use]
    pub fn minutes(&self) -> f64 {
        self.duration.as_secs_f64() / 60.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn test_parameter_lookup() {
        let ts = Utc.with_ymd_and_hms(2014, 2, 17, 10, 0, 0).unwrap();
        let event = Event::new("p", GAME_PROGRESSION, ts)
            .with_parameter("Stage", "3")
            .with_parameter(INCREASE_PARAMETER, "2.5")
            .with_parameter(INCREASE_PARAMETER, "1");
        assert_eq!(event.parameter(INCREASE_PARAMETER), Some("2.5"));
        assert_eq!(
            event.parameter_values(INCREASE_PARAMETER).collect::<Vec<_>>(),
            vec!["2.5", "1"]
        );
        assert_eq!(event.parameter("Missing"), None);
    }

    #[test]
    fn test_timed_event_minutes() {
        let ts = Utc.with_ymd_and_hms(2014, 2, 17, 10, 0, 0).unwrap();
        let timed = TimedEvent::new(Event::new("p", LEVEL_DURATION, ts), Duration::from_secs(90));
        assert_eq!(timed.minutes(), 1.5);
    }

    #[test]
    fn test_deserialize_without_parameters() {
        let json = r#"{
            "player": "p-1",
            "version": "1.0",
            "action": "Game Feature Consumed",
            "timestamp": "2014-02-17T10:00:00Z"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.player, "p-1");
        assert!(event.parameters.is_empty());
        assert_eq!(
            event.timestamp,
            Utc.with_ymd_and_hms(2014, 2, 17, 10, 0, 0).unwrap()
        );
    }
}
