//! # Geographic Utilities
//!
//! Distance and bounding-box helpers for decoded routes.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine`] | Great-circle distance between two lat/lng pairs, in km |
//! | [`haversine_km`] | Same, for two [`GeoPoint`]s |
//! | [`route_bounds`] | Bounding box of a decoded route |
//!
//! ## Example
//!
//! ```rust
//! use ride_matcher::{GeoPoint, geo_utils};
//!
//! let london = GeoPoint::new(51.5074, -0.1278);
//! let paris = GeoPoint::new(48.8566, 2.3522);
//!
//! let km = geo_utils::haversine_km(&london, &paris);
//! assert!((km - 343.5).abs() < 1.0);
//! ```
//!
//! ## Algorithm Notes
//!
//! ### Haversine Formula
//!
//! Distances assume a spherical Earth with a mean radius of 6371.0 km:
//!
//! `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlng/2)`, `d = 2·R·asin(√a)`.
//!
//! Reference: [Haversine formula (Wikipedia)](https://en.wikipedia.org/wiki/Haversine_formula)

use geo::{BoundingRect, Coord, LineString};

use crate::GeoPoint;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// Distance Functions
// =============================================================================

/// Great-circle distance in kilometres between two lat/lng pairs in degrees.
///
/// Total over finite input. Symmetric, and zero for coincident points.
///
/// # Example
///
/// ```rust
/// use ride_matcher::geo_utils::haversine;
///
/// assert_eq!(haversine(38.5, -120.2, 38.5, -120.2), 0.0);
/// ```
#[inline]
pub fn haversine(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let d_lat = lat2 - lat1;
    let d_lng = lng2.to_radians() - lng1.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Great-circle distance in kilometres between two points.
#[inline]
pub fn haversine_km(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    haversine(p1.latitude, p1.longitude, p2.latitude, p2.longitude)
}

// =============================================================================
// Bounding Box Functions
// =============================================================================

/// Bounding box of a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// Compute the bounding box of a route.
///
/// Returns `None` for an empty route.
///
/// # Example
///
/// ```rust
/// use ride_matcher::{GeoPoint, geo_utils};
///
/// let route = vec![
///     GeoPoint::new(51.5000, -0.1300),
///     GeoPoint::new(51.5100, -0.1200),
/// ];
///
/// let bounds = geo_utils::route_bounds(&route).unwrap();
/// assert_eq!(bounds.min_lat, 51.5000);
/// assert_eq!(bounds.max_lng, -0.1200);
/// ```
pub fn route_bounds(points: &[GeoPoint]) -> Option<Bounds> {
    let line: LineString = points.iter().map(|&p| Coord::from(p)).collect();
    let rect = line.bounding_rect()?;

    Some(Bounds {
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_lng: rect.min().x,
        max_lng: rect.max().x,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
