//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, MatchResult, Preference, SearchRequest};

/// Request body for a route search.
///
/// Every field is optional at the parsing stage so that a missing stop
/// name is reported as such rather than as a generic JSON error.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRoutesRequest {
    /// Boarding stop name
    pub origin: Option<String>,

    /// Alighting stop name
    pub destination: Option<String>,

    /// One of "none", "shortest_time", "lowest_fare", "fewest_transfers"
    pub preference: Option<String>,

    /// Maximum fare (inclusive); zero or absent means no limit
    pub budget: Option<f64>,
}

/// Why a search body could not become a [`SearchRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// A required field was absent or null
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field failed domain validation
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

impl SearchRoutesRequest {
    /// Validate the body into a domain request.
    pub fn into_search_request(self) -> Result<SearchRequest, RequestError> {
        let origin = self.origin.ok_or(RequestError::MissingField("origin"))?;
        let destination = self
            .destination
            .ok_or(RequestError::MissingField("destination"))?;
        let preference = self
            .preference
            .as_deref()
            .map(Preference::parse)
            .unwrap_or_default();

        Ok(SearchRequest::new(origin, destination)?
            .with_preference(preference)
            .with_budget(self.budget))
    }
}

/// A matching sub-trip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultDto {
    /// Matched route ID
    pub route_id: String,

    /// Matched route label
    pub route_name: String,

    /// Origin as requested
    pub origin: String,

    /// Destination as requested
    pub destination: String,

    /// Lower-cased stops from origin to destination
    pub stops: Vec<String>,

    /// Fare for the sub-trip
    pub fare: f64,

    /// Number of changes (always 0)
    pub transfers: u32,

    /// Estimated travel time in minutes
    pub time: u32,

    /// First station of the sub-trip
    pub first_station: String,

    /// Last station of the sub-trip
    pub last_station: String,
}

impl MatchResultDto {
    /// Convert a domain match.
    pub fn from_match(m: &MatchResult) -> Self {
        Self {
            route_id: m.route_id.to_string(),
            route_name: m.route_name.clone(),
            origin: m.origin.clone(),
            destination: m.destination.clone(),
            stops: m.stops.clone(),
            fare: m.fare,
            transfers: m.transfers,
            time: m.time,
            first_station: m.first_station.clone(),
            last_station: m.last_station.clone(),
        }
    }
}

/// Response for a route search.
#[derive(Debug, Serialize)]
pub struct SearchRoutesResponse {
    /// Matches in preference order (possibly empty)
    pub results: Vec<MatchResultDto>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
