//! End-to-end trace analysis and reporting.
//!
//! Cleaner output feeds both the landmark detector and the duration
//! aggregator; neither mutates it.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::durations::TripDurations;
use crate::error::Result;
use crate::geo_utils::path_length;
use crate::{clean_trajectory, detect_landmarks, AnalysisConfig, Landmark, Landmarks, TrackPoint};

/// Everything derived from one raw fix sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceAnalysis {
    /// Number of fixes handed to the cleaner
    pub raw_point_count: usize,
    /// Cleaned trajectory, in acquisition order
    pub cleaned: Vec<TrackPoint>,
    /// Stop and left-turn landmarks
    pub landmarks: Landmarks,
    /// Total and moving time of the cleaned trajectory
    pub durations: TripDurations,
    /// Great-circle length of the cleaned path in meters
    pub distance_m: f64,
}

impl TraceAnalysis {
    /// Run the cleaner, then detection and duration aggregation on its output.
    pub fn from_points(points: &[TrackPoint], config: &AnalysisConfig) -> Self {
        let cleaned = clean_trajectory(points, config);
        let landmarks = detect_landmarks(&cleaned, config);
        let durations = TripDurations::from_trajectory(&cleaned, config);
        let distance_m = path_length(&cleaned);

        info!(
            "[pipeline] {} raw -> {} cleaned points, {} stops, {} left turns, {:.2} km (total {}, moving {})",
            points.len(),
            cleaned.len(),
            landmarks.stops.len(),
            landmarks.turns.len(),
            distance_m / 1000.0,
            durations.total,
            durations.moving
        );

        Self {
            raw_point_count: points.len(),
            cleaned,
            landmarks,
            durations,
            distance_m,
        }
    }

    /// Flatten into a serializable report.
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            raw_points: self.raw_point_count,
            cleaned_points: self.cleaned.len(),
            stop_count: self.landmarks.stops.len(),
            turn_count: self.landmarks.turns.len(),
            stops: self.landmarks.stops.clone(),
            turns: self.landmarks.turns.clone(),
            total_duration: self.durations.total.formatted(),
            moving_duration: self.durations.moving.formatted(),
            distance_km: self.distance_m / 1000.0,
        }
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_summary_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(writer, &self.summary())?;
        Ok(())
    }
}

/// Report for downstream tools. Durations are `HH:MM:SS` or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    pub raw_points: usize,
    pub cleaned_points: usize,
    pub stop_count: usize,
    pub turn_count: usize,
    pub stops: Vec<Landmark>,
    pub turns: Vec<Landmark>,
    pub total_duration: Option<String>,
    pub moving_duration: Option<String>,
    pub distance_km: f64,
}
