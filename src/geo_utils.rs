//! Geographic utilities: great-circle distance and bounding boxes.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::{Landmark, TrackPoint};

/// Great-circle distance in meters between two coordinates.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    Haversine::distance(Point::new(lon1, lat1), Point::new(lon2, lat2))
}

/// Total length of a path in meters.
pub fn path_length(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(w[0].latitude, w[0].longitude, w[1].latitude, w[1].longitude))
        .sum()
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Bounds of `(latitude, longitude)` pairs, `None` when empty.
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = coords.into_iter();
        let (lat, lng) = iter.next()?;
        let mut bounds = Self {
            min_lat: lat,
            max_lat: lat,
            min_lng: lng,
            max_lng: lng,
        };
        for (lat, lng) in iter {
            bounds.min_lat = bounds.min_lat.min(lat);
            bounds.max_lat = bounds.max_lat.max(lat);
            bounds.min_lng = bounds.min_lng.min(lng);
            bounds.max_lng = bounds.max_lng.max(lng);
        }
        Some(bounds)
    }

    /// Bounds of a fix sequence.
    pub fn from_points(points: &[TrackPoint]) -> Option<Self> {
        Self::from_coords(points.iter().map(|p| (p.latitude, p.longitude)))
    }

    /// Whether the landmark lies inside (or on the edge of) the box.
    pub fn contains(&self, landmark: &Landmark) -> bool {
        landmark.latitude >= self.min_lat
            && landmark.latitude <= self.max_lat
            && landmark.longitude >= self.min_lng
            && landmark.longitude <= self.max_lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clean_trajectory, AnalysisConfig};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_path_length() {
        // 0.001 degrees of latitude is ~111 m
        let points: Vec<TrackPoint> = (0..4)
            .map(|i| TrackPoint::new(i as f64 * 0.001, 0.0, 10.0))
            .collect();
        assert!(approx_eq(path_length(&points), 333.6, 1.0));
        assert_eq!(path_length(&points[..1]), 0.0);
    }

    #[test]
    fn test_cleaned_path_keeps_length() {
        let config = AnalysisConfig::default();
        let raw: Vec<TrackPoint> = (0..7)
            .map(|i| TrackPoint::new(46.0 + i as f64 * 0.001, 7.5, 25.0))
            .collect();

        // A straight road thins to its endpoints without losing distance.
        let cleaned = clean_trajectory(&raw, &config);
        assert_eq!(cleaned.len(), 2);
        let length = path_length(&cleaned);
        assert!(approx_eq(length, path_length(&raw), 0.01));
        assert!(approx_eq(length, 667.2, 1.0));
    }

    #[test]
    fn test_bounds() {
        let points = vec![
            TrackPoint::new(51.50, -0.13, 0.0),
            TrackPoint::new(51.51, -0.12, 0.0),
            TrackPoint::new(51.505, -0.125, 0.0),
        ];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.min_lat, 51.50);
        assert_eq!(bounds.max_lat, 51.51);
        assert_eq!(bounds.min_lng, -0.13);
        assert_eq!(bounds.max_lng, -0.12);
        assert!(bounds.contains(&Landmark::new(51.505, -0.125)));
        assert!(!bounds.contains(&Landmark::new(51.52, -0.125)));
        assert!(Bounds::from_points(&[]).is_none());
    }
}
