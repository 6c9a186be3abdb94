//! Basic example of matching a rider against a few offered rides.
//!
//! Run with: cargo run --example basic_matching

use ride_matcher::{
    match_rides_detailed, polyline, GeoPoint, MatchConfig, MatchQuery, RideCandidate,
};

struct Ride {
    id: u32,
    driver: &'static str,
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

fn main() {
    // Turin, heading north (~1.1km between points)
    let northbound: Vec<GeoPoint> = (0..40)
        .map(|i| GeoPoint::new(45.0703 + i as f64 * 0.01, 7.6869))
        .collect();

    let mut southbound = northbound.clone();
    southbound.reverse();

    // Milan
    let elsewhere: Vec<GeoPoint> = (0..10)
        .map(|i| GeoPoint::new(45.4642 + i as f64 * 0.01, 9.1900))
        .collect();

    let rides = vec![
        Ride { id: 1, driver: "northbound", route: polyline::encode(&northbound) },
        Ride { id: 2, driver: "southbound", route: polyline::encode(&southbound) },
        Ride { id: 3, driver: "broken", route: "_p~i".to_string() },
        Ride { id: 4, driver: "milan", route: polyline::encode(&elsewhere) },
    ];

    let config = MatchConfig::default();
    let query = MatchQuery::new(
        GeoPoint::new(45.1003, 7.6869),
        GeoPoint::new(45.3003, 7.6871),
        None,
    );

    println!("Ride Matching Example\n");
    println!(
        "Rider: {:?} -> {:?} within {}km\n",
        query.origin, query.destination, query.radius_km
    );

    let report = match_rides_detailed(&query, &rides, &config);

    for m in &report.matched {
        println!(
            "  Match: ride {} ({}), pickup at point {}, drop-off at point {}",
            m.ride.id, m.ride.driver, m.route_match.origin_index, m.route_match.destination_index
        );
    }
    for s in &report.skipped {
        println!("  Skipped ride {}: {}", s.ride_id, s.error);
    }

    match report.into_rides() {
        Ok(rides) => println!("\n{} ride(s) matched", rides.len()),
        Err(e) => println!("\n{}", e),
    }
}
