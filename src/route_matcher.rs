//! # Route Matching
//!
//! Decides whether a decoded route serves a rider: the route must pass within
//! the radius of the rider's origin, and strictly later within the radius of
//! the rider's destination.
//!
//! Long routes are sampled rather than scanned point by point. See
//! [`sampling_stride`]. A true match can be missed when the only in-radius
//! points fall between samples; that is the price of a bounded scan.

use crate::geo_utils::haversine_km;
use crate::{GeoPoint, MatchConfig};

/// Indices of the first sampled route points within radius of the rider's
/// origin and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch {
    pub origin_index: usize,
    pub destination_index: usize,
}

/// Step between sampled route points.
///
/// Routes with up to `exhaustive_scan_limit` points are scanned fully.
/// Longer routes use `point_count / sample_count`, never less than 1.
///
/// # Example
/// ```
/// use ride_matcher::{sampling_stride, MatchConfig};
///
/// let config = MatchConfig::default();
/// assert_eq!(sampling_stride(10, &config), 1);
/// assert_eq!(sampling_stride(1000, &config), 50);
/// ```
pub fn sampling_stride(point_count: usize, config: &MatchConfig) -> usize {
    if point_count <= config.exhaustive_scan_limit {
        return 1;
    }
    (point_count / config.sample_count.max(1)).max(1)
}

/// Find where a route passes the rider's origin and destination.
///
/// Returns `Some` only when both were found and the origin comes first.
/// A route that meets both points in reverse order doesn't match.
pub fn find_route_match(
    points: &[GeoPoint],
    origin: &GeoPoint,
    destination: &GeoPoint,
    radius_km: f64,
    config: &MatchConfig,
) -> Option<RouteMatch> {
    let stride = sampling_stride(points.len(), config);
    let mut origin_index = None;
    let mut destination_index = None;

    for (i, point) in points.iter().enumerate().step_by(stride) {
        if origin_index.is_none() && haversine_km(point, origin) <= radius_km {
            origin_index = Some(i);
        }
        if destination_index.is_none() && haversine_km(point, destination) <= radius_km {
            destination_index = Some(i);
        }
        if origin_index.is_some() && destination_index.is_some() {
            break;
        }
    }

    match (origin_index, destination_index) {
        (Some(origin_index), Some(destination_index)) if origin_index < destination_index => {
            Some(RouteMatch { origin_index, destination_index })
        }
        _ => None,
    }
}

/// Whether a route serves the rider. See [`find_route_match`].
pub fn route_matches(
    points: &[GeoPoint],
    origin: &GeoPoint,
    destination: &GeoPoint,
    radius_km: f64,
    config: &MatchConfig,
) -> bool {
    find_route_match(points, origin, destination, radius_km, config).is_some()
}
