#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry for geofence zones.
//!
//! Derives circular zone boundaries from a center point and radius using
//! an equirectangular approximation, normalizes externally supplied rings,
//! and provides an R-tree backed [`ZoneIndex`] for point-in-zone lookups.
//!
//! The approximation is accurate for regional zones (a few kilometers
//! across) and degrades toward the poles where `cos(lat)` approaches zero.

mod index;

pub use index::{ZoneHit, ZoneIndex};

use std::f64::consts::PI;

use geo::{Distance as _, Haversine, Point};
use thiserror::Error;
use tourist_safety_geofence_models::LatLon;

/// Equatorial Earth radius in meters (WGS84 semi-major axis).
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Number of sampled boundary points in a circle-derived ring, not counting
/// the closing point.
pub const CIRCLE_SEGMENTS: usize = 64;

/// Errors from ring normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpatialError {
    /// The ring does not describe an area.
    #[error("Polygon needs at least 2 distinct points, got {distinct}")]
    TooFewPoints {
        /// Number of distinct points supplied.
        distinct: usize,
    },
}

/// Approximates a circle on the Earth's surface as a closed ring.
///
/// Samples [`CIRCLE_SEGMENTS`] equally spaced bearings around `center`,
/// offsets each by `radius_meters` in a local planar frame and converts
/// the offset back to degrees. The first point is repeated at the end, so
/// the result always has `CIRCLE_SEGMENTS + 1` points.
///
/// Callers must pass a positive radius; the function itself never fails.
#[must_use]
pub fn circle_polygon(center: LatLon, radius_meters: f64) -> Vec<LatLon> {
    let lat = center.lat.to_radians();
    let lon = center.lon.to_radians();
    let lon_scale = EARTH_RADIUS_METERS * lat.cos();

    #[allow(clippy::cast_precision_loss)]
    let mut ring: Vec<LatLon> = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = (i as f64 / CIRCLE_SEGMENTS as f64) * 2.0 * PI;
            let dx = radius_meters * angle.cos();
            let dy = radius_meters * angle.sin();
            LatLon::new(
                (lat + dy / EARTH_RADIUS_METERS).to_degrees(),
                (lon + dx / lon_scale).to_degrees(),
            )
        })
        .collect();

    ring.push(ring[0]);
    ring
}

/// Closes `points` into a ring by repeating the first point at the end if
/// it is not already there.
///
/// # Errors
///
/// Returns [`SpatialError::TooFewPoints`] if fewer than 2 distinct points
/// are supplied.
pub fn close_ring(mut points: Vec<LatLon>) -> Result<Vec<LatLon>, SpatialError> {
    let distinct = distinct_points(&points);
    if distinct < 2 {
        return Err(SpatialError::TooFewPoints { distinct });
    }

    if points.first() != points.last() {
        points.push(points[0]);
    }

    Ok(points)
}

fn distinct_points(points: &[LatLon]) -> usize {
    let mut seen: Vec<LatLon> = Vec::with_capacity(points.len());
    for point in points {
        if !seen.contains(point) {
            seen.push(*point);
        }
    }
    seen.len()
}

/// Great-circle distance between two points in meters.
#[must_use]
pub fn haversine_meters(a: LatLon, b: LatLon) -> f64 {
    Haversine.distance(to_point(a), to_point(b))
}

/// Converts to a `geo` point (x = longitude, y = latitude).
#[must_use]
pub fn to_point(p: LatLon) -> Point<f64> {
    Point::new(p.lon, p.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_has_closed_ring_of_65_points() {
        let ring = circle_polygon(LatLon::new(27.7, 85.3), 1000.0);
        assert_eq!(ring.len(), CIRCLE_SEGMENTS + 1);
        assert_eq!(ring[0], ring[CIRCLE_SEGMENTS]);
    }

    #[test]
    fn circle_points_are_equidistant_from_center() {
        for (lat, lon) in [(27.7, 85.3), (0.0, 0.0), (-33.86, 151.2), (51.5, -0.12)] {
            let center = LatLon::new(lat, lon);
            let radius = 500.0;
            for point in &circle_polygon(center, radius)[..CIRCLE_SEGMENTS] {
                let d = haversine_meters(center, *point);
                // Equirectangular offset vs. great-circle distance on a
                // slightly smaller sphere: within 1% for regional radii.
                assert!(
                    (d - radius).abs() / radius < 0.01,
                    "point {point} is {d}m from {center}"
                );
            }
        }
    }

    #[test]
    fn point_uses_lon_as_x() {
        let point = to_point(LatLon::new(27.7, 85.3));
        assert!((point.x() - 85.3).abs() < f64::EPSILON);
        assert!((point.y() - 27.7).abs() < f64::EPSILON);
        assert!(haversine_meters(LatLon::new(27.7, 85.3), LatLon::new(27.7, 85.3)).abs() < 1e-9);
    }

    #[test]
    fn circle_is_deterministic() {
        let center = LatLon::new(27.7, 85.3);
        assert_eq!(circle_polygon(center, 250.0), circle_polygon(center, 250.0));
    }

    #[test]
    fn first_sample_is_due_east() {
        let center = LatLon::new(27.7, 85.3);
        let ring = circle_polygon(center, 1000.0);
        assert!((ring[0].lat - center.lat).abs() < 1e-12);
        assert!(ring[0].lon > center.lon);
        // Quarter turn later the point is due north.
        assert!((ring[16].lon - center.lon).abs() < 1e-9);
        assert!(ring[16].lat > center.lat);
    }

    #[test]
    fn close_ring_appends_first_point() {
        let ring = close_ring(vec![
            LatLon::new(27.7, 85.3),
            LatLon::new(27.7, 85.35),
            LatLon::new(27.75, 85.35),
        ])
        .unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn close_ring_leaves_closed_ring_alone() {
        let points = vec![
            LatLon::new(1.0, 1.0),
            LatLon::new(1.0, 2.0),
            LatLon::new(2.0, 2.0),
            LatLon::new(1.0, 1.0),
        ];
        assert_eq!(close_ring(points.clone()).unwrap(), points);
    }

    #[test]
    fn close_ring_rejects_degenerate_input() {
        assert_eq!(
            close_ring(vec![]),
            Err(SpatialError::TooFewPoints { distinct: 0 })
        );
        assert_eq!(
            close_ring(vec![LatLon::new(1.0, 1.0), LatLon::new(1.0, 1.0)]),
            Err(SpatialError::TooFewPoints { distinct: 1 })
        );
    }
}
