//! # Batch Ride Matching
//!
//! Runs the route matcher over a batch of candidate rides supplied by the
//! calling layer. Rides are expected to be time-filtered already.
//!
//! A ride whose route fails to decode is logged and skipped; the rest of the
//! batch still runs. Matches come back in input order. An empty result is
//! [`MatchError::NoMatches`], which callers should treat as "not found".

use std::fmt::Display;

use log::{debug, warn};
use thiserror::Error;

use crate::polyline::{self, DecodeError};
use crate::route_matcher::{find_route_match, RouteMatch};
use crate::{GeoPoint, MatchConfig, DEFAULT_RADIUS_KM};

/// A ride offered by the calling layer.
///
/// The matcher only reads the ride's identity and encoded route.
pub trait RideCandidate {
    type Id: Display;

    fn ride_id(&self) -> Self::Id;

    /// Encoded polyline from the ride's origin to its destination.
    fn route(&self) -> &str;
}

/// Errors returned by batch matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no matching rides found")]
    NoMatches,
}

/// A rider's match request as received at the API boundary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchRequest {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    /// Search radius in km. Only used when strictly positive.
    #[cfg_attr(feature = "serde", serde(default))]
    pub radius: Option<f64>,
}

/// A rider's origin, destination and search radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchQuery {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub radius_km: f64,
}

impl MatchQuery {
    /// Create a query. A missing or non-positive radius always becomes
    /// [`DEFAULT_RADIUS_KM`]; use [`MatchQuery::from_request`] to fall back to
    /// a [`MatchConfig`]'s `default_radius_km` instead.
    ///
    /// # Example
    /// ```
    /// use ride_matcher::{GeoPoint, MatchQuery};
    ///
    /// let q = MatchQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.1, 0.0), Some(-1.0));
    /// assert_eq!(q.radius_km, 0.5);
    /// ```
    pub fn new(origin: GeoPoint, destination: GeoPoint, radius_km: Option<f64>) -> Self {
        Self {
            origin,
            destination,
            radius_km: resolve_radius(radius_km, DEFAULT_RADIUS_KM),
        }
    }

    /// Build a query from a boundary request, falling back to
    /// `config.default_radius_km`.
    pub fn from_request(request: &MatchRequest, config: &MatchConfig) -> Self {
        Self {
            origin: GeoPoint::new(request.origin_lat, request.origin_lng),
            destination: GeoPoint::new(request.destination_lat, request.destination_lng),
            radius_km: resolve_radius(request.radius, config.default_radius_km),
        }
    }
}

fn resolve_radius(radius_km: Option<f64>, default_km: f64) -> f64 {
    match radius_km {
        Some(r) if r > 0.0 => r,
        _ => default_km,
    }
}

/// A matched ride along with where its route passes the rider.
#[derive(Debug)]
pub struct MatchedRide<'a, C> {
    pub ride: &'a C,
    pub route_match: RouteMatch,
}

/// A ride left out because its route couldn't be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRide<I> {
    pub ride_id: I,
    pub error: DecodeError,
}

/// Full outcome of a batch match.
#[derive(Debug)]
pub struct MatchReport<'a, C: RideCandidate> {
    /// Matched rides, in input order.
    pub matched: Vec<MatchedRide<'a, C>>,
    /// Rides whose route failed to decode, in input order.
    pub skipped: Vec<SkippedRide<C::Id>>,
}

impl<'a, C: RideCandidate> MatchReport<'a, C> {
    /// Matched rides in input order, or [`MatchError::NoMatches`].
    pub fn into_rides(self) -> Result<Vec<&'a C>, MatchError> {
        if self.matched.is_empty() {
            return Err(MatchError::NoMatches);
        }
        Ok(self.matched.into_iter().map(|m| m.ride).collect())
    }
}

enum Outcome<'a, C: RideCandidate> {
    Matched(MatchedRide<'a, C>),
    Skipped(SkippedRide<C::Id>),
    NoMatch,
}

fn evaluate<'a, C: RideCandidate>(
    query: &MatchQuery,
    ride: &'a C,
    config: &MatchConfig,
) -> Outcome<'a, C> {
    let points = match polyline::decode(ride.route()) {
        Ok(points) => points,
        Err(error) => {
            let ride_id = ride.ride_id();
            warn!("Failed to decode route for ride {}: {}", ride_id, error);
            return Outcome::Skipped(SkippedRide { ride_id, error });
        }
    };

    match find_route_match(&points, &query.origin, &query.destination, query.radius_km, config) {
        Some(route_match) => Outcome::Matched(MatchedRide { ride, route_match }),
        None => Outcome::NoMatch,
    }
}

fn collect_report<'a, C: RideCandidate>(
    outcomes: impl IntoIterator<Item = Outcome<'a, C>>,
    total: usize,
) -> MatchReport<'a, C> {
    let mut report = MatchReport { matched: Vec::new(), skipped: Vec::new() };

    for outcome in outcomes {
        match outcome {
            Outcome::Matched(m) => report.matched.push(m),
            Outcome::Skipped(s) => report.skipped.push(s),
            Outcome::NoMatch => {}
        }
    }

    debug!(
        "Matched {} of {} rides ({} skipped)",
        report.matched.len(),
        total,
        report.skipped.len()
    );
    report
}

/// Match every candidate and report matches and decode failures.
///
/// Never fails: broken routes end up in [`MatchReport::skipped`].
pub fn match_rides_detailed<'a, C: RideCandidate>(
    query: &MatchQuery,
    candidates: &'a [C],
    config: &MatchConfig,
) -> MatchReport<'a, C> {
    collect_report(
        candidates.iter().map(|ride| evaluate(query, ride, config)),
        candidates.len(),
    )
}

/// Return the candidates whose routes serve the rider, in input order.
///
/// # Errors
///
/// [`MatchError::NoMatches`] when no candidate matches, including an empty
/// candidate list.
pub fn match_rides<'a, C: RideCandidate>(
    query: &MatchQuery,
    candidates: &'a [C],
    config: &MatchConfig,
) -> Result<Vec<&'a C>, MatchError> {
    match_rides_detailed(query, candidates, config).into_rides()
}

/// Same as [`match_rides`], evaluating candidates on the rayon pool.
///
/// Input order is preserved.
#[cfg(feature = "parallel")]
pub fn match_rides_parallel<'a, C>(
    query: &MatchQuery,
    candidates: &'a [C],
    config: &MatchConfig,
) -> Result<Vec<&'a C>, MatchError>
where
    C: RideCandidate + Sync,
    C::Id: Send,
{
    use rayon::prelude::*;

    let outcomes: Vec<Outcome<'a, C>> = candidates
        .par_iter()
        .map(|ride| evaluate(query, ride, config))
        .collect();

    collect_report(outcomes, candidates.len()).into_rides()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::encode;

    #[derive(Debug, Clone, PartialEq)]
    struct Ride {
        id: u32,
        route: String,
    }

    impl RideCandidate for Ride {
        type Id = u32;

        fn ride_id(&self) -> u32 {
            self.id
        }

        fn route(&self) -> &str {
            &self.route
        }
    }

    fn northbound(start_lat: f64, n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint::new(start_lat + i as f64 * 0.01, 7.0))
            .collect()
    }

    fn ride(id: u32, points: &[GeoPoint]) -> Ride {
        Ride { id, route: encode(points) }
    }

    fn query() -> MatchQuery {
        MatchQuery::new(GeoPoint::new(45.02, 7.0), GeoPoint::new(45.07, 7.0), None)
    }

    fn ids(rides: &[&Ride]) -> Vec<u32> {
        rides.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_radius_defaults() {
        let o = GeoPoint::new(0.0, 0.0);
        assert_eq!(MatchQuery::new(o, o, None).radius_km, 0.5);
        assert_eq!(MatchQuery::new(o, o, Some(0.0)).radius_km, 0.5);
        assert_eq!(MatchQuery::new(o, o, Some(-2.0)).radius_km, 0.5);
        assert_eq!(MatchQuery::new(o, o, Some(f64::NAN)).radius_km, 0.5);
        assert_eq!(MatchQuery::new(o, o, Some(2.0)).radius_km, 2.0);
    }

    #[test]
    fn test_from_request_uses_config_default() {
        let request = MatchRequest {
            origin_lat: 45.0,
            origin_lng: 7.0,
            destination_lat: 45.1,
            destination_lng: 7.1,
            radius: None,
        };
        let config = MatchConfig { default_radius_km: 1.25, ..MatchConfig::default() };

        let q = MatchQuery::from_request(&request, &config);
        assert_eq!(q.origin, GeoPoint::new(45.0, 7.0));
        assert_eq!(q.destination, GeoPoint::new(45.1, 7.1));
        assert_eq!(q.radius_km, 1.25);

        let q = MatchQuery::from_request(&MatchRequest { radius: Some(-1.0), ..request.clone() }, &config);
        assert_eq!(q.radius_km, 1.25);

        let q = MatchQuery::from_request(&MatchRequest { radius: Some(3.0), ..request }, &config);
        assert_eq!(q.radius_km, 3.0);

        // `new` ignores the config and always falls back to the constant
        let q = MatchQuery::new(q.origin, q.destination, None);
        assert_eq!(q.radius_km, DEFAULT_RADIUS_KM);
    }

    #[test]
    fn test_matches_keep_input_order() {
        let rides = vec![
            ride(3, &northbound(45.0, 10)),
            ride(1, &northbound(46.0, 10)),
            ride(2, &northbound(44.99, 12)),
        ];

        let matched = match_rides(&query(), &rides, &MatchConfig::default()).unwrap();
        assert_eq!(ids(&matched), vec![3, 2]);
    }

    #[test]
    fn test_decode_failure_skips_only_that_ride() {
        let rides = vec![
            ride(1, &northbound(45.0, 10)),
            Ride { id: 2, route: "_p~i".to_string() },
            ride(3, &northbound(45.0, 10)),
        ];

        let matched = match_rides(&query(), &rides, &MatchConfig::default()).unwrap();
        assert_eq!(ids(&matched), vec![1, 3]);
    }

    #[test]
    fn test_detailed_report() {
        let rides = vec![
            Ride { id: 9, route: "_p~iF".to_string() },
            ride(4, &northbound(45.0, 10)),
            ride(5, &northbound(46.0, 10)),
        ];

        let report = match_rides_detailed(&query(), &rides, &MatchConfig::default());

        assert_eq!(report.matched.len(), 1);
        assert_eq!(report.matched[0].ride.id, 4);
        assert_eq!(
            report.matched[0].route_match,
            RouteMatch { origin_index: 2, destination_index: 7 }
        );
        assert_eq!(
            report.skipped,
            vec![SkippedRide { ride_id: 9, error: DecodeError::Truncated { index: 5 } }]
        );
    }

    #[test]
    fn test_reverse_ride_is_not_matched() {
        let mut southbound = northbound(45.0, 10);
        southbound.reverse();
        let rides = vec![ride(1, &southbound)];

        assert_eq!(
            match_rides(&query(), &rides, &MatchConfig::default()),
            Err(MatchError::NoMatches)
        );
    }

    #[test]
    fn test_empty_candidates() {
        let rides: Vec<Ride> = vec![];
        assert_eq!(
            match_rides(&query(), &rides, &MatchConfig::default()),
            Err(MatchError::NoMatches)
        );
    }

    #[test]
    fn test_all_routes_broken_is_no_match() {
        let rides = vec![
            Ride { id: 1, route: "_p~i".to_string() },
            Ride { id: 2, route: "\u{7f}".to_string() },
        ];
        let report = match_rides_detailed(&query(), &rides, &MatchConfig::default());
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.into_rides(), Err(MatchError::NoMatches));
    }

    #[test]
    fn test_no_matches_message() {
        assert_eq!(MatchError::NoMatches.to_string(), "no matching rides found");
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let rides: Vec<Ride> = (0..200)
            .map(|i| match i % 4 {
                0 => ride(i, &northbound(45.0, 10)),
                1 => ride(i, &northbound(46.0, 10)),
                2 => Ride { id: i, route: "_p~i".to_string() },
                _ => ride(i, &northbound(44.95, 80)),
            })
            .collect();
        let config = MatchConfig::default();

        let sequential = match_rides(&query(), &rides, &config).unwrap();
        let parallel = match_rides_parallel(&query(), &rides, &config).unwrap();
        assert_eq!(ids(&sequential), ids(&parallel));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_request_deserialize() {
        let request: MatchRequest = serde_json::from_str(
            r#"{"origin_lat": 45.02, "origin_lng": 7.0, "destination_lat": 45.07, "destination_lng": 7.0}"#,
        )
        .unwrap();
        assert_eq!(request.radius, None);

        let q = MatchQuery::from_request(&request, &MatchConfig::default());
        assert_eq!(q, query());
    }
}
