//! Ordering of matched sub-trips.
//!
//! Each preference maps to a single numeric sort key. Sorting is stable, so
//! matches with equal keys keep the order in which they were found.

use crate::domain::{MatchResult, Preference};

/// Extracts the value a preference orders by.
pub type SortKey = fn(&MatchResult) -> f64;

/// The sort key for a preference, or `None` when no reordering applies.
pub fn sort_key(preference: Preference) -> Option<SortKey> {
    let key: SortKey = match preference {
        Preference::ShortestTime => |m| f64::from(m.time),
        Preference::LowestFare => |m| m.fare,
        Preference::FewestTransfers => |m| f64::from(m.transfers),
        Preference::None => return None,
    };

    Some(key)
}

/// Order matches by preference.
///
/// Returns matches sorted ascending by the preference's key, or unchanged
/// for [`Preference::None`].
pub fn rank_matches(mut matches: Vec<MatchResult>, preference: Preference) -> Vec<MatchResult> {
    if let Some(key) = sort_key(preference) {
        matches.sort_by(|a, b| key(a).total_cmp(&key(b)));
    }

    matches
}
