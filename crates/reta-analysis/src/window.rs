use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::error::ConfigError;

/// Half-open interval `[begin, end)` of event timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ConfigError> {
        if begin >= end {
            return Err(ConfigError::EmptyWindow {
                begin: begin.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { begin, end })
    }

    #[must_use]
    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.begin <= timestamp && timestamp < self.end
    }

    /// Whether a full day after `first_seen` still falls inside the window.
    #[must_use]
    pub fn allows_day1_observation(&self, first_seen: DateTime<Utc>) -> bool {
        first_seen + TimeDelta::days(1) <= self.end
    }
}
