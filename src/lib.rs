//! # Trace Landmarks
//!
//! Turns a raw satellite-navigation log into an annotated path: a cleaned
//! trajectory, stop and left-turn landmarks, and trip timing.
//!
//! This library provides:
//! - NMEA `RMC` sentence parsing into [`TrackPoint`]s
//! - Trajectory cleaning (parked runs, jump outliers, straight-run thinning)
//! - Stop and left-turn detection with mean-clustered landmarks
//! - Total and moving duration aggregation
//! - KML export of the path and its landmarks
//!
//! ## Features
//!
//! - **`cli`** (default) - Build the `gps-to-kml` command-line tool
//!
//! ## Quick Start
//!
//! ```rust
//! use trace_landmarks::{AnalysisConfig, TraceAnalysis, TrackPoint};
//!
//! // Ten fixes heading due north at 20 knots
//! let points: Vec<TrackPoint> = (0..10)
//!     .map(|i| TrackPoint::new(51.5 + i as f64 * 0.0001, -0.12, 20.0))
//!     .collect();
//!
//! let analysis = TraceAnalysis::from_points(&points, &AnalysisConfig::default());
//!
//! // A straight road keeps only its endpoints
//! assert_eq!(analysis.cleaned.len(), 2);
//! assert!(analysis.landmarks.stops.is_empty());
//! ```
//!
//! All geometry is planar on decimal degrees; no ellipsoidal corrections
//! are applied.

use chrono::{DateTime, Utc};
use geo::Coord;
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TraceError};

// Analysis thresholds
pub mod config;
pub use config::AnalysisConfig;

// Planar vector tests shared by the cleaner and the detector
pub mod geometry;

// Noise and redundancy removal
pub mod cleaner;
pub use cleaner::clean_trajectory;

// Stop / left-turn clustering
pub mod landmarks;
pub use landmarks::{detect_landmarks, ClusterBuffer, Landmarks};

// Total and moving time
pub mod durations;
pub use durations::{format_hms, moving_duration, total_duration, ElapsedTime, TripDurations};

// Geographic utilities (distance, bounds)
pub mod geo_utils;
pub use geo_utils::Bounds;

// NMEA log parsing
pub mod nmea;
pub use nmea::{load_track, parse_nmea_file, parse_nmea_reader, parse_rmc_sentence};

// KML emission
pub mod kml;
pub use kml::{write_kml, write_kml_file, KmlOptions};

// End-to-end analysis and reporting
pub mod pipeline;
pub use pipeline::{TraceAnalysis, TraceSummary};

// ============================================================================
// Core Types
// ============================================================================

/// A single position fix.
///
/// Speed is in knots as reported by the receiver. The timestamp is absent
/// when the source record could not be time-stamped.
///
/// # Example
/// ```
/// use trace_landmarks::TrackPoint;
/// let point = TrackPoint::new(48.1173, 11.5167, 22.4);
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_knots: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrackPoint {
    /// Create a fix without a timestamp.
    pub fn new(latitude: f64, longitude: f64, speed_knots: f64) -> Self {
        Self {
            latitude,
            longitude,
            speed_knots,
            timestamp: None,
        }
    }

    /// Attach a timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Planar position as `(x = longitude, y = latitude)`.
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Check if the point has valid coordinates and a usable speed.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
            && self.speed_knots.is_finite()
            && self.speed_knots >= 0.0
    }
}

/// A representative coordinate for one stop or turn cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub latitude: f64,
    pub longitude: f64,
}

impl Landmark {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Arithmetic mean of `(latitude, longitude)` members.
    ///
    /// Returns `None` for an empty member list. The mean is clamped to the
    /// members' per-axis range, since `sum / n` can round just outside it.
    pub fn mean_of(members: &[(f64, f64)]) -> Option<Self> {
        let &(first_lat, first_lon) = members.first()?;
        let n = members.len() as f64;

        let init = (0.0, 0.0, first_lat, first_lat, first_lon, first_lon);
        let (lat_sum, lon_sum, min_lat, max_lat, min_lon, max_lon) = members.iter().fold(
            init,
            |(lat_sum, lon_sum, min_lat, max_lat, min_lon, max_lon), &(lat, lon)| {
                (
                    lat_sum + lat,
                    lon_sum + lon,
                    min_lat.min(lat),
                    max_lat.max(lat),
                    min_lon.min(lon),
                    max_lon.max(lon),
                )
            },
        );

        Some(Self::new(
            (lat_sum / n).clamp(min_lat, max_lat),
            (lon_sum / n).clamp(min_lon, max_lon),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
