//! Planar vector tests on `(longitude, latitude)` coordinates.
//!
//! Degrees are treated as flat Cartesian units. That is inaccurate for
//! distances but adequate for the local angle tests used here.

use geo::Coord;

use crate::AnalysisConfig;

/// 2D cross (wedge) product `u.x * v.y - u.y * v.x`.
///
/// Positive when `v` bends counter-clockwise (left) from `u`.
pub fn cross(u: Coord<f64>, v: Coord<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

/// 2D dot product.
pub fn dot(u: Coord<f64>, v: Coord<f64>) -> f64 {
    u.x * v.x + u.y * v.y
}

/// Squared Euclidean length.
pub fn norm_sq(u: Coord<f64>) -> f64 {
    dot(u, u)
}

/// Whether `b` sits on a straight run between `a` and `c`.
///
/// Requires both a near-zero cross product and tightly aligned segment
/// directions, so reversals (collinear but opposite) are not straight.
/// Degenerate (near zero-length) segments are never straight.
pub fn is_straight(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>, config: &AnalysisConfig) -> bool {
    let u = b - a;
    let v = c - b;

    let u_len_sq = norm_sq(u);
    let v_len_sq = norm_sq(v);
    if u_len_sq < config.min_segment_length_sq || v_len_sq < config.min_segment_length_sq {
        return false;
    }

    if cross(u, v).abs() >= config.collinear_tolerance {
        return false;
    }

    let cosine = dot(u, v) / (u_len_sq.sqrt() * v_len_sq.sqrt());
    cosine > config.straight_min_cosine
}

/// Signed sine of the bend at `b` for the path `a -> b -> c`.
///
/// Returns `None` when either segment is shorter than `min_length`.
pub fn turn_sine(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>, min_length: f64) -> Option<f64> {
    let u = b - a;
    let v = c - b;

    let u_len = norm_sq(u).sqrt();
    let v_len = norm_sq(v).sqrt();
    if u_len < min_length || v_len < min_length {
        return None;
    }

    Some(cross(u, v) / (u_len * v_len))
}

/// Whether the path `a -> b -> c` bends left by more than the configured sine.
pub fn is_left_turn(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>, config: &AnalysisConfig) -> bool {
    turn_sine(a, b, c, config.min_turn_segment_degrees)
        .is_some_and(|sine| sine > config.min_turn_sine)
}
