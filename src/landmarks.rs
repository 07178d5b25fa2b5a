//! Stop and left-turn landmark detection.
//!
//! One sliding-window scan over a cleaned trajectory classifies each center
//! fix twice, independently:
//! - **stop**: speed at or below the stopped threshold
//! - **left turn**: speed at or above the turn-eligible threshold and a
//!   widened-baseline bend to the left
//!
//! Contiguous runs of qualifying fixes accumulate in a [`ClusterBuffer`] and
//! collapse to one averaged [`Landmark`] when the run ends, so a real-world
//! turn yields one marker instead of one per fix.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cleaner::is_parked;
use crate::geometry::is_left_turn;
use crate::{AnalysisConfig, Landmark, TrackPoint};

/// Members of one in-progress stop or turn event.
///
/// Members are `(latitude, longitude)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClusterBuffer {
    #[default]
    Idle,
    Accumulating(Vec<(f64, f64)>),
}

impl ClusterBuffer {
    /// Append a member, opening the cluster if idle.
    pub fn push(&mut self, latitude: f64, longitude: f64) {
        match self {
            ClusterBuffer::Idle => *self = ClusterBuffer::Accumulating(vec![(latitude, longitude)]),
            ClusterBuffer::Accumulating(members) => members.push((latitude, longitude)),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ClusterBuffer::Accumulating(_))
    }

    /// Close the cluster, returning the mean of its members.
    ///
    /// The buffer is `Idle` afterwards. Flushing an idle buffer yields `None`.
    pub fn flush(&mut self) -> Option<Landmark> {
        match std::mem::take(self) {
            ClusterBuffer::Idle => None,
            ClusterBuffer::Accumulating(members) => Landmark::mean_of(&members),
        }
    }

    /// Push on a qualifying fix, otherwise flush into `out`.
    fn step(&mut self, qualifies: bool, point: &TrackPoint, out: &mut Vec<Landmark>) {
        if qualifies {
            self.push(point.latitude, point.longitude);
        } else if let Some(landmark) = self.flush() {
            out.push(landmark);
        }
    }
}

/// Stop and left-turn landmarks, each in the order their clusters closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmarks {
    pub stops: Vec<Landmark>,
    pub turns: Vec<Landmark>,
}

/// Detect stop and left-turn landmarks along a cleaned trajectory.
///
/// Only fixes with `turn_baseline` neighbors on each side are scanned;
/// shorter trajectories yield no landmarks.
pub fn detect_landmarks(trajectory: &[TrackPoint], config: &AnalysisConfig) -> Landmarks {
    let mut landmarks = Landmarks::default();
    if trajectory.len() < config.min_detection_points() {
        return landmarks;
    }

    let k = config.turn_baseline;
    let mut stop_cluster = ClusterBuffer::default();
    let mut turn_cluster = ClusterBuffer::default();

    for i in k..trajectory.len() - k {
        let point = &trajectory[i];

        stop_cluster.step(is_parked(point, config), point, &mut landmarks.stops);

        // Vectors are (lon, lat); cluster members stay (lat, lon).
        let turning = point.speed_knots >= config.turn_min_speed_knots
            && is_left_turn(
                trajectory[i - k].coord(),
                point.coord(),
                trajectory[i + k].coord(),
                config,
            );
        turn_cluster.step(turning, point, &mut landmarks.turns);
    }

    landmarks.stops.extend(stop_cluster.flush());
    landmarks.turns.extend(turn_cluster.flush());

    debug!(
        "[landmarks] {} stops, {} left turns from {} points",
        landmarks.stops.len(),
        landmarks.turns.len(),
        trajectory.len()
    );

    landmarks
}
