//! A sub-trip found on a stored route.

use super::route::RouteId;

/// One matching sub-trip, built fresh for each search.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// ID of the matched route.
    pub route_id: RouteId,

    /// Display label of the matched route.
    pub route_name: String,

    /// Origin as given in the request.
    pub origin: String,

    /// Destination as given in the request.
    pub destination: String,

    /// Lower-cased stops from origin to destination, inclusive.
    pub stops: Vec<String>,

    /// Route fare, or the configured fallback.
    pub fare: f64,

    /// Number of changes. Always zero: each match is a single route.
    pub transfers: u32,

    /// Estimated travel time in minutes.
    pub time: u32,

    /// First station of the sub-trip (the request origin).
    pub first_station: String,

    /// Last station of the sub-trip (the request destination).
    pub last_station: String,
}
