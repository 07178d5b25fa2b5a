//! Total and moving trip durations.
//!
//! Durations are whole seconds derived from fix timestamps. When there is
//! nothing to measure the result is [`ElapsedTime::Unavailable`] rather than
//! a zero that could be mistaken for a real measurement.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AnalysisConfig, TrackPoint};

/// Elapsed time in whole seconds, or no measurement at all.
///
/// Out-of-order timestamps are not corrected, so `Seconds` can be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElapsedTime {
    Seconds(i64),
    Unavailable,
}

impl ElapsedTime {
    pub fn seconds(&self) -> Option<i64> {
        match self {
            ElapsedTime::Seconds(s) => Some(*s),
            ElapsedTime::Unavailable => None,
        }
    }

    /// `HH:MM:SS` text, or `None` when unavailable.
    pub fn formatted(&self) -> Option<String> {
        self.seconds().map(format_hms)
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElapsedTime::Seconds(s) => f.write_str(&format_hms(*s)),
            ElapsedTime::Unavailable => f.write_str("n/a"),
        }
    }
}

/// Format seconds as zero-padded `HH:MM:SS`.
///
/// Hours do not wrap at 24 and may use more than two digits.
pub fn format_hms(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, secs)
}

/// Time between the first and last fix.
///
/// Unavailable for fewer than two fixes or when either endpoint lacks a
/// timestamp.
pub fn total_duration(trajectory: &[TrackPoint]) -> ElapsedTime {
    if trajectory.len() < 2 {
        return ElapsedTime::Unavailable;
    }
    let first = trajectory[0].timestamp;
    let last = trajectory[trajectory.len() - 1].timestamp;
    match (first, last) {
        (Some(start), Some(end)) => ElapsedTime::Seconds((end - start).num_seconds()),
        _ => ElapsedTime::Unavailable,
    }
}

/// Sum of elapsed time over adjacent pairs where either fix is moving.
///
/// Pairs missing a timestamp on either side are skipped. Unavailable when
/// no pair contributes.
pub fn moving_duration(trajectory: &[TrackPoint], config: &AnalysisConfig) -> ElapsedTime {
    let mut total = 0i64;
    let mut contributing = 0usize;

    for pair in trajectory.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.speed_knots <= config.moving_speed_knots && b.speed_knots <= config.moving_speed_knots
        {
            continue;
        }
        if let (Some(start), Some(end)) = (a.timestamp, b.timestamp) {
            total += (end - start).num_seconds();
            contributing += 1;
        }
    }

    if contributing == 0 {
        ElapsedTime::Unavailable
    } else {
        ElapsedTime::Seconds(total)
    }
}

/// Both trip durations for one trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDurations {
    pub total: ElapsedTime,
    pub moving: ElapsedTime,
}

impl TripDurations {
    pub fn from_trajectory(trajectory: &[TrackPoint], config: &AnalysisConfig) -> Self {
        Self {
            total: total_duration(trajectory),
            moving: moving_duration(trajectory, config),
        }
    }
}
