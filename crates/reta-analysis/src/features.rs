//! Per-player feature extraction.
//!
//! A player takes part in a run only if a full day fits in the window after their
//! first event, so that day-1 retention can actually be observed. For every such
//! player the extractor aggregates:
//!
//! | feature              | source                                                   |
//! |----------------------|----------------------------------------------------------|
//! | `tutorial_momentum`  | minutes of the last "Tutorial Duration" timed event      |
//! | `level_momentum`     | summed "Level Duration" minutes divided by `1 + count`   |
//! | `gameplay_consumed`  | number of "Game Feature Consumed" events                 |
//! | `social_activities`  | number of "Social Feature Consumed" events               |
//! | `progression`        | sum of "Increase" parameters of "Game Progression" events |
//! | `level`              | `floor(progression / 5)`                                 |
//! | `day1_retention`     | last event at least one day after the first event        |

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use reta_regression::DataPoint;
use serde::Serialize;
use tracing::warn;

use crate::{
    event::{
        Event, GAME_FEATURE_CONSUMED, GAME_PROGRESSION, INCREASE_PARAMETER, LEVEL_DURATION,
        SOCIAL_FEATURE_CONSUMED, TUTORIAL_DURATION, TimedEvent,
    },
    window::TimeWindow,
};

/// Progression points per level.
pub const PROGRESSION_PER_LEVEL: f64 = 5.0;

/// Name of the outcome predicted from [`PlayerFeatures`].
pub const OBSERVED_NAME: &str = "Day 1 Retention";

/// Regression variable names, in [`PlayerFeatures::variables`] order.
pub const VARIABLE_NAMES: [&str; 6] = [
    "Tutorial Momentum",
    "Level Momentum",
    "Gameplay Consumed",
    "Social Activity",
    "Progression",
    "Level",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerFeatures {
    pub name: String,
    pub tutorial_momentum: f64,
    pub level_momentum: f64,
    pub gameplay_consumed: u32,
    pub social_activities: u32,
    pub progression: f64,
    pub level: i64,
    pub day1_retention: bool,
}

impl PlayerFeatures {
    /// Feature values in [`VARIABLE_NAMES`] order.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn variables(&self) -> [f64; 6] {
        [
            self.tutorial_momentum,
            self.level_momentum,
            f64::from(self.gameplay_consumed),
            f64::from(self.social_activities),
            self.progression,
            self.level as f64,
        ]
    }

    #[must_use]
    pub fn to_data_point(&self) -> DataPoint {
        DataPoint::from_outcome(self.day1_retention, self.variables().to_vec())
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    gameplay_consumed: u32,
    social_activities: u32,
    progression: f64,
    first_seen: Option<DateTime<Utc>>,
    last_seen: Option<DateTime<Utc>>,
    tutorial_minutes: Option<f64>,
    level_minutes: f64,
    level_count: u32,
}

impl Accumulator {
    fn add_event(&mut self, event: &Event) {
        match event.action.as_str() {
            GAME_FEATURE_CONSUMED => self.gameplay_consumed += 1,
            SOCIAL_FEATURE_CONSUMED => self.social_activities += 1,
            GAME_PROGRESSION => {
                self.progression += event
                    .parameter_values(INCREASE_PARAMETER)
                    .map(|value| parse_increase(event, value))
                    .sum::<f64>();
            }
            _ => {}
        }
        let ts = event.timestamp;
        self.first_seen = Some(self.first_seen.map_or(ts, |first| first.min(ts)));
        self.last_seen = Some(self.last_seen.map_or(ts, |last| last.max(ts)));
    }

    fn add_timed_event(&mut self, timed: &TimedEvent) {
        match timed.info.action.as_str() {
            TUTORIAL_DURATION => self.tutorial_minutes = Some(timed.minutes()),
            LEVEL_DURATION => {
                self.level_count += 1;
                self.level_minutes += timed.minutes();
            }
            _ => {}
        }
    }

    fn finish(self, name: &str) -> PlayerFeatures {
        let retained = match (self.first_seen, self.last_seen) {
            (Some(first), Some(last)) => last - (first + TimeDelta::days(1)) >= TimeDelta::zero(),
            _ => false,
        };
        #[expect(clippy::cast_possible_truncation)]
        let level = (self.progression / PROGRESSION_PER_LEVEL).floor() as i64;
        PlayerFeatures {
            name: name.to_owned(),
            tutorial_momentum: self.tutorial_minutes.unwrap_or(0.0),
            level_momentum: self.level_minutes / f64::from(1 + self.level_count),
            gameplay_consumed: self.gameplay_consumed,
            social_activities: self.social_activities,
            progression: self.progression,
            level,
            day1_retention: retained,
        }
    }
}

fn parse_increase(event: &Event, value: &str) -> f64 {
    value.trim().parse().unwrap_or_else(|_| {
        warn!(
            player = %event.player,
            value,
            "ignoring unparsable progression increase"
        );
        0.0
    })
}

/// Builds one [`PlayerFeatures`] per eligible player.
///
/// `events` and `timed_events` are expected to be the window's records in ascending
/// timestamp order. Players appear in the order of their first event; records that
/// fall outside the window are ignored.
#[must_use]
pub fn extract_features(
    window: &TimeWindow,
    events: &[Event],
    timed_events: &[TimedEvent],
) -> Vec<PlayerFeatures> {
    let mut order = Vec::new();
    let mut seen = HashMap::new();
    for event in events.iter().filter(|e| window.contains(e.timestamp)) {
        if !seen.contains_key(event.player.as_str()) {
            let eligible = window.allows_day1_observation(event.timestamp);
            seen.insert(event.player.as_str(), eligible);
            if eligible {
                order.push(event.player.as_str());
            }
        }
    }

    let mut accumulators = order
        .iter()
        .map(|&name| (name, Accumulator::default()))
        .collect::<HashMap<_, _>>();
    for event in events.iter().filter(|e| window.contains(e.timestamp)) {
        if let Some(acc) = accumulators.get_mut(event.player.as_str()) {
            acc.add_event(event);
        }
    }
    for timed in timed_events
        .iter()
        .filter(|e| window.contains(e.info.timestamp))
    {
        if let Some(acc) = accumulators.get_mut(timed.info.player.as_str()) {
            acc.add_timed_event(timed);
        }
    }

    order
        .into_iter()
        .filter_map(|name| accumulators.remove(name).map(|acc| acc.finish(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone as _;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 2, day, hour, 0, 0).unwrap()
    }

    fn window() -> TimeWindow {
        TimeWindow::new(at(1, 0), at(10, 0)).unwrap()
    }

    fn progression(player: &str, ts: DateTime<Utc>, increase: &str) -> Event {
        Event::new(player, GAME_PROGRESSION, ts).with_parameter(INCREASE_PARAMETER, increase)
    }

    fn timed(player: &str, action: &str, ts: DateTime<Utc>, minutes: u64) -> TimedEvent {
        TimedEvent::new(Event::new(player, action, ts), Duration::from_secs(minutes * 60))
    }

    #[test]
    fn test_counts_and_progression() {
        let events = vec![
            Event::new("a", GAME_FEATURE_CONSUMED, at(1, 0)),
            Event::new("a", GAME_FEATURE_CONSUMED, at(1, 1)),
            Event::new("a", SOCIAL_FEATURE_CONSUMED, at(1, 2)),
            progression("a", at(1, 3), "7.5"),
            progression("a", at(1, 4), "4"),
            Event::new("a", "Unknown Action", at(1, 5)),
        ];
        let features = extract_features(&window(), &events, &[]);
        assert_eq!(features.len(), 1);
        let a = &features[0];
        assert_eq!(a.name, "a");
        assert_eq!(a.gameplay_consumed, 2);
        assert_eq!(a.social_activities, 1);
        assert_eq!(a.progression, 11.5);
        assert_eq!(a.level, 2);
        assert!(!a.day1_retention);
    }

    #[test]
    fn test_unparsable_increase_counts_as_zero() {
        let events = vec![
            progression("a", at(1, 0), "3"),
            progression("a", at(1, 1), "lots"),
        ];
        let features = extract_features(&window(), &events, &[]);
        assert_eq!(features[0].progression, 3.0);
        assert_eq!(features[0].level, 0);
    }

    #[test]
    fn test_day1_retention_boundary() {
        let events = vec![
            Event::new("exact", GAME_FEATURE_CONSUMED, at(1, 6)),
            Event::new("early", GAME_FEATURE_CONSUMED, at(1, 6)),
            Event::new("early", GAME_FEATURE_CONSUMED, at(2, 5)),
            Event::new("exact", GAME_FEATURE_CONSUMED, at(2, 6)),
        ];
        let features = extract_features(&window(), &events, &[]);
        let names = features.iter().map(|f| f.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["exact", "early"]);
        assert!(features[0].day1_retention);
        assert!(!features[1].day1_retention);
    }

    #[test]
    fn test_eligibility_uses_first_event() {
        let window = TimeWindow::new(at(1, 0), at(5, 0)).unwrap();
        let events = vec![
            Event::new("old", GAME_FEATURE_CONSUMED, at(3, 0)),
            Event::new("new", GAME_FEATURE_CONSUMED, at(4, 1)),
            Event::new("old", GAME_FEATURE_CONSUMED, at(4, 2)),
        ];
        let features = extract_features(&window, &events, &[]);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "old");
        assert_eq!(features[0].gameplay_consumed, 2);
    }

    #[test]
    fn test_ignores_records_outside_window() {
        let window = TimeWindow::new(at(2, 0), at(9, 0)).unwrap();
        let events = vec![
            Event::new("a", GAME_FEATURE_CONSUMED, at(1, 0)),
            Event::new("a", GAME_FEATURE_CONSUMED, at(2, 0)),
            Event::new("a", GAME_FEATURE_CONSUMED, at(9, 0)),
        ];
        let timed_events = vec![timed("a", TUTORIAL_DURATION, at(9, 0), 10)];
        let features = extract_features(&window, &events, &timed_events);
        assert_eq!(features[0].gameplay_consumed, 1);
        assert_eq!(features[0].tutorial_momentum, 0.0);
    }

    #[test]
    fn test_tutorial_momentum_keeps_last() {
        let events = vec![Event::new("a", GAME_FEATURE_CONSUMED, at(1, 0))];
        let timed_events = vec![
            timed("a", TUTORIAL_DURATION, at(1, 1), 4),
            timed("b", TUTORIAL_DURATION, at(1, 2), 99),
            timed("a", TUTORIAL_DURATION, at(1, 3), 6),
        ];
        let features = extract_features(&window(), &events, &timed_events);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].tutorial_momentum, 6.0);
    }

    #[test]
    fn test_level_momentum_divides_by_one_plus_count() {
        let events = vec![Event::new("a", GAME_FEATURE_CONSUMED, at(1, 0))];
        let timed_events = vec![
            timed("a", LEVEL_DURATION, at(1, 1), 3),
            timed("a", LEVEL_DURATION, at(1, 2), 6),
        ];
        let features = extract_features(&window(), &events, &timed_events);
        // (3 + 6) / (1 + 2)
        assert_eq!(features[0].level_momentum, 3.0);

        let features = extract_features(&window(), &events, &[]);
        assert_eq!(features[0].level_momentum, 0.0);
    }

    #[test]
    fn test_level_floors_negative_progression() {
        let events = vec![progression("a", at(1, 0), "-1")];
        let features = extract_features(&window(), &events, &[]);
        assert_eq!(features[0].level, -1);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_features(&window(), &[], &[]).is_empty());
    }

    #[test]
    fn test_to_data_point() {
        let features = PlayerFeatures {
            name: "a".to_owned(),
            tutorial_momentum: 1.5,
            level_momentum: 2.0,
            gameplay_consumed: 3,
            social_activities: 4,
            progression: 12.0,
            level: 2,
            day1_retention: true,
        };
        let point = features.to_data_point();
        assert_eq!(point.label, 1.0);
        assert_eq!(point.variables, vec![1.5, 2.0, 3.0, 4.0, 12.0, 2.0]);
        assert_eq!(point.variables.len(), VARIABLE_NAMES.len());
    }
}
