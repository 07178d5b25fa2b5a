//! Trajectory cleaning.
//!
//! A single left-to-right pass that removes:
//! - the trailing run of parked fixes (engine idling after arrival)
//! - the leading run of parked fixes (before departure), once only
//! - sudden jumps from the last kept fix (corrupt fixes, not real travel)
//! - interior fixes lying on a straight run
//!
//! Straight-run thinning looks at the fix's neighbors in the *raw* input,
//! not at the neighbors that survived into the output. Running the cleaner
//! again on its own output can therefore thin further, even though the
//! parked-run trims are stable.

use log::debug;

use crate::geometry::is_straight;
use crate::{AnalysisConfig, TrackPoint};

/// Clean a raw fix sequence, preserving the relative order of survivors.
///
/// The output may be empty (no fix ever above the stopped threshold).
pub fn clean_trajectory(points: &[TrackPoint], config: &AnalysisConfig) -> Vec<TrackPoint> {
    let Some(last_moving) = points.iter().rposition(|p| !is_parked(p, config)) else {
        debug!("[cleaner] no moving fix among {} points", points.len());
        return Vec::new();
    };

    let mut cleaned = Vec::with_capacity(last_moving + 1);
    let mut leading_parked = true;
    let mut last_kept: Option<&TrackPoint> = None;
    let mut jumps = 0usize;
    let mut thinned = 0usize;

    for (i, point) in points[..=last_moving].iter().enumerate() {
        if leading_parked {
            if is_parked(point, config) {
                continue;
            }
            leading_parked = false;
        }

        if let Some(prev) = last_kept {
            if is_jump(prev, point, config) {
                jumps += 1;
                continue;
            }
        }

        // Neighbors are raw input fixes; the final retained index is never thinned.
        if i > 0
            && i < last_moving
            && is_straight(points[i - 1].coord(), point.coord(), points[i + 1].coord(), config)
        {
            thinned += 1;
            continue;
        }

        cleaned.push(*point);
        last_kept = Some(point);
    }

    debug!(
        "[cleaner] kept {} of {} points ({} trailing parked, {} jumps, {} thinned)",
        cleaned.len(),
        points.len(),
        points.len() - last_moving - 1,
        jumps,
        thinned
    );

    cleaned
}

/// Whether a fix is at or below the stopped threshold.
pub fn is_parked(point: &TrackPoint, config: &AnalysisConfig) -> bool {
    point.speed_knots <= config.stopped_speed_knots
}

fn is_jump(prev: &TrackPoint, point: &TrackPoint, config: &AnalysisConfig) -> bool {
    (point.latitude - prev.latitude).abs() > config.max_jump_degrees
        || (point.longitude - prev.longitude).abs() > config.max_jump_degrees
}
