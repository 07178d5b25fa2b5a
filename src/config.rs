//! Thresholds for trace cleaning, landmark detection and duration aggregation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TraceError};

/// Largest accepted `turn_baseline`; keeps `2k + 1` far from overflow.
const MAX_TURN_BASELINE: usize = usize::MAX / 4;

/// Configuration for the analysis pipeline.
///
/// All geometry is planar in decimal degrees, so the length and area
/// tolerances below are in degrees and degrees² respectively.
///
/// Any field missing from a JSON config file falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Speed at or below which a fix counts as stopped/parked.
    /// Default: 5.0 knots
    pub stopped_speed_knots: f64,

    /// Minimum speed for turn geometry to be evaluated at all.
    /// Default: 3.0 knots
    pub turn_min_speed_knots: f64,

    /// A pair of fixes counts towards moving time when either speed exceeds this.
    /// Default: 2.0 knots
    pub moving_speed_knots: f64,

    /// Per-axis jump (from the last kept fix) above which a fix is discarded as corrupt.
    /// Default: 0.25 degrees
    pub max_jump_degrees: f64,

    /// Cross products below this magnitude are treated as zero.
    /// Default: 1e-12
    pub collinear_tolerance: f64,

    /// Squared segment length below which straight-run thinning is skipped.
    /// Default: 1e-12
    pub min_segment_length_sq: f64,

    /// Cosine between consecutive segments required to thin a point.
    /// Default: 0.999
    pub straight_min_cosine: f64,

    /// Minimum length of either turn vector (~1 m at the equator).
    /// Default: 1e-5 degrees
    pub min_turn_segment_degrees: f64,

    /// Normalized cross product above which a bend is a left turn (~17.5°).
    /// Default: 0.3
    pub min_turn_sine: f64,

    /// Index offset of the neighbors used for the turn vectors.
    /// Default: 2
    pub turn_baseline: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stopped_speed_knots: 5.0,
            turn_min_speed_knots: 3.0,
            moving_speed_knots: 2.0,
            max_jump_degrees: 0.25,
            collinear_tolerance: 1e-12,
            min_segment_length_sq: 1e-12,
            straight_min_cosine: 0.999,
            min_turn_segment_degrees: 1e-5,
            min_turn_sine: 0.3,
            turn_baseline: 2,
        }
    }
}

impl AnalysisConfig {
    /// Load a config from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Parse a config from JSON text and validate it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("stopped_speed_knots", self.stopped_speed_knots),
            ("turn_min_speed_knots", self.turn_min_speed_knots),
            ("moving_speed_knots", self.moving_speed_knots),
            ("max_jump_degrees", self.max_jump_degrees),
            ("collinear_tolerance", self.collinear_tolerance),
            ("min_segment_length_sq", self.min_segment_length_sq),
            ("min_turn_segment_degrees", self.min_turn_segment_degrees),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TraceError::config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if !(self.straight_min_cosine > 0.0 && self.straight_min_cosine <= 1.0) {
            return Err(TraceError::config(format!(
                "straight_min_cosine must be within (0, 1], got {}",
                self.straight_min_cosine
            )));
        }
        if !(0.0..=1.0).contains(&self.min_turn_sine) {
            return Err(TraceError::config(format!(
                "min_turn_sine must be within [0, 1], got {}",
                self.min_turn_sine
            )));
        }
        if self.turn_baseline == 0 || self.turn_baseline > MAX_TURN_BASELINE {
            return Err(TraceError::config(format!(
                "turn_baseline must be within [1, {}], got {}",
                MAX_TURN_BASELINE, self.turn_baseline
            )));
        }
        Ok(())
    }

    /// Shortest trajectory the detector will scan: `turn_baseline` valid
    /// neighbors on each side of at least one center point.
    pub fn min_detection_points(&self) -> usize {
        self.turn_baseline.saturating_mul(2).saturating_add(1)
    }
}
