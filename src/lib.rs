//! # Ride Matcher
//!
//! Geospatial ride matching for a carpooling backend.
//!
//! This library provides:
//! - Decoding (and encoding) of standard polyline route strings
//! - Haversine great-circle distances in kilometres
//! - Direction-aware route matching of a rider's origin and destination
//! - Batch matching over candidate rides that tolerates broken routes
//!
//! ## Features
//!
//! - **`serde`** - Serialize/Deserialize for points, config and match requests
//! - **`parallel`** - Enable parallel batch matching with rayon
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use ride_matcher::{match_rides, GeoPoint, MatchConfig, MatchQuery, RideCandidate};
//!
//! struct Ride {
//!     id: u32,
//!     route: String,
//! }
//!
//! impl RideCandidate for Ride {
//!     type Id = u32;
//!     fn ride_id(&self) -> u32 { self.id }
//!     fn route(&self) -> &str { &self.route }
//! }
//!
//! let path = vec![
//!     GeoPoint::new(38.5, -120.2),
//!     GeoPoint::new(40.7, -120.95),
//!     GeoPoint::new(43.252, -126.453),
//! ];
//! let rides = vec![Ride { id: 7, route: ride_matcher::polyline::encode(&path) }];
//!
//! let query = MatchQuery::new(GeoPoint::new(38.5, -120.2), GeoPoint::new(43.252, -126.453), None);
//! let matched = match_rides(&query, &rides, &MatchConfig::default()).unwrap();
//! assert_eq!(matched[0].id, 7);
//! ```

pub mod geo_utils;
pub mod matching;
pub mod polyline;
pub mod route_matcher;

pub use geo_utils::{haversine, haversine_km, Bounds};
pub use matching::{
    match_rides, match_rides_detailed, MatchError, MatchQuery, MatchReport, MatchRequest,
    MatchedRide, RideCandidate, SkippedRide,
};
#[cfg(feature = "parallel")]
pub use matching::match_rides_parallel;
pub use polyline::{decode, encode, DecodeError};
pub use route_matcher::{find_route_match, route_matches, sampling_stride, RouteMatch};

use geo::Coord;

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with latitude and longitude in degrees.
///
/// # Example
/// ```
/// use ride_matcher::GeoPoint;
/// let point = GeoPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

impl From<GeoPoint> for Coord {
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.longitude, y: p.latitude }
    }
}

impl From<Coord> for GeoPoint {
    fn from(c: Coord) -> Self {
        GeoPoint::new(c.y, c.x)
    }
}

/// Radius used when a query doesn't supply a usable one, in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 0.5;

/// Configuration for route matching.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchConfig {
    /// Radius applied when a query's radius is missing or not strictly positive.
    /// Default: 0.5 km
    pub default_radius_km: f64,

    /// Routes with at most this many points are scanned point by point.
    /// Default: 50
    pub exhaustive_scan_limit: usize,

    /// Approximate number of evenly spaced samples taken from longer routes.
    /// Default: 20
    pub sample_count: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            default_radius_km: DEFAULT_RADIUS_KM,
            exhaustive_scan_limit: 50,
            sample_count: 20,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
