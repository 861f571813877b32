//! Route matching over stored route records.
//!
//! This module implements the core lookup that answers:
//! "Which stored routes pass through my origin and then my destination?"
//!
//! Every route in the store is scanned; a route matches when both stops
//! appear in its stop sequence with the origin first. The matching slice
//! of stops becomes a sub-trip whose fare and time are derived from the
//! route, and the sub-trips are finally ordered by the requested preference.

mod config;
mod rank;
mod search;


pub use config::MatcherConfig;
pub use rank::{SortKey, rank_matches, sort_key};
pub use search::RouteMatcher;
