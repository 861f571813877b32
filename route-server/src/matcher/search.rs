//! Sub-trip search over a snapshot of stored routes.
//!
//! Finds every route whose stop sequence passes through the requested
//! origin and later through the requested destination.

use tracing::{debug, warn};

use crate::domain::{MatchResult, RecordRead, RouteRecord, SearchRequest};

use super::config::MatcherConfig;
use super::rank::rank_matches;

/// Request stop names, lower-cased once per search.
struct NormalizedQuery {
    origin: String,
    destination: String,
}

impl NormalizedQuery {
    fn new(request: &SearchRequest) -> Self {
        Self {
            origin: request.origin.to_lowercase(),
            destination: request.destination.to_lowercase(),
        }
    }
}

/// Route matcher.
///
/// Holds no state between searches; every call works on its own copies
/// of the data it needs.
pub struct RouteMatcher<'a> {
    config: &'a MatcherConfig,
}

impl<'a> RouteMatcher<'a> {
    /// Create a new matcher.
    pub fn new(config: &'a MatcherConfig) -> Self {
        Self { config }
    }

    /// Search a route snapshot for sub-trips from origin to destination.
    ///
    /// Malformed records are logged and skipped. The result is ordered by
    /// the request's preference and may be empty.
    pub fn search(&self, request: &SearchRequest, routes: &[RecordRead]) -> Vec<MatchResult> {
        let query = NormalizedQuery::new(request);
        let mut matches = Vec::new();
        let mut malformed = 0usize;

        for read in routes {
            let record = match read {
                Ok(record) => record,
                Err(e) => {
                    warn!(key = %e.key, reason = %e.reason, "skipping malformed route record");
                    malformed += 1;
                    continue;
                }
            };

            if let Some(found) = self.match_normalized(request, &query, record) {
                matches.push(found);
            }
        }

        debug!(
            scanned = routes.len(),
            malformed,
            matched = matches.len(),
            preference = request.preference.as_str(),
            "route scan complete"
        );

        rank_matches(matches, request.preference)
    }

    /// Match a single route against a request.
    ///
    /// Returns `None` unless both stops are on the route with the origin
    /// strictly before the destination, and the fare fits the budget.
    pub fn match_route(&self, request: &SearchRequest, record: &RouteRecord) -> Option<MatchResult> {
        self.match_normalized(request, &NormalizedQuery::new(request), record)
    }

    fn match_normalized(
        &self,
        request: &SearchRequest,
        query: &NormalizedQuery,
        record: &RouteRecord,
    ) -> Option<MatchResult> {
        let mut stops: Vec<String> = record.stops.iter().map(|s| s.to_lowercase()).collect();

        let origin_idx = stops.iter().position(|s| *s == query.origin)?;
        let destination_idx = stops.iter().position(|s| *s == query.destination)?;

        // Same stop or wrong direction.
        if origin_idx >= destination_idx {
            return None;
        }

        let fare = record.fare.unwrap_or(self.config.default_fare);
        if request.budget.is_some_and(|budget| !budget.allows(fare)) {
            return None;
        }

        stops.truncate(destination_idx + 1);
        stops.drain(..origin_idx);

        Some(MatchResult {
            route_id: record.id.clone(),
            route_name: record.route_name.clone(),
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            time: self.config.estimate_time(stops.len()),
            stops,
            fare,
            transfers: 0,
            first_station: request.origin.clone(),
            last_station: request.destination.clone(),
        })
    }
}
