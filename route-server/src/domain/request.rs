//! Route search requests.

use super::error::DomainError;

/// How to order matching sub-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preference {
    /// Keep storage order.
    #[default]
    None,
    /// Ascending travel time.
    ShortestTime,
    /// Ascending fare.
    LowestFare,
    /// Ascending number of transfers.
    FewestTransfers,
}

impl Preference {
    /// All preferences, in wire order.
    pub const ALL: [Preference; 4] = [
        Preference::None,
        Preference::ShortestTime,
        Preference::LowestFare,
        Preference::FewestTransfers,
    ];

    /// Parse a wire value. Unrecognised values fall back to [`Preference::None`].
    pub fn parse(s: &str) -> Self {
        match s {
            "shortest_time" => Preference::ShortestTime,
            "lowest_fare" => Preference::LowestFare,
            "fewest_transfers" => Preference::FewestTransfers,
            _ => Preference::None,
        }
    }

    /// The wire value for this preference.
    pub fn as_str(self) -> &'static str {
        match self {
            Preference::None => "none",
            Preference::ShortestTime => "shortest_time",
            Preference::LowestFare => "lowest_fare",
            Preference::FewestTransfers => "fewest_transfers",
        }
    }
}

/// Inclusive upper bound on fare.
///
/// Zero and NaN are "no budget", so a `Budget` always constrains something.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget(f64);

impl Budget {
    /// Create a budget, or `None` if `limit` means "unbounded".
    pub fn new(limit: f64) -> Option<Self> {
        if limit == 0.0 || limit.is_nan() {
            None
        } else {
            Some(Self(limit))
        }
    }

    /// The fare limit.
    pub fn limit(self) -> f64 {
        self.0
    }

    /// Whether a fare fits within this budget.
    pub fn allows(self, fare: f64) -> bool {
        fare <= self.0
    }
}

/// A validated route search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Boarding stop, as typed by the user.
    pub origin: String,

    /// Alighting stop, as typed by the user.
    pub destination: String,

    /// Ordering of the results.
    pub preference: Preference,

    /// Optional fare limit.
    pub budget: Option<Budget>,
}

impl SearchRequest {
    /// Create a request with no preference and no budget.
    ///
    /// Stop names are kept verbatim (they are echoed back in results) but
    /// must not be blank.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let origin = origin.into();
        let destination = destination.into();

        if origin.trim().is_empty() {
            return Err(DomainError::BlankStopName("origin"));
        }
        if destination.trim().is_empty() {
            return Err(DomainError::BlankStopName("destination"));
        }

        Ok(Self {
            origin,
            destination,
            preference: Preference::None,
            budget: None,
        })
    }

    /// Set the result ordering.
    pub fn with_preference(mut self, preference: Preference) -> Self {
        self.preference = preference;
        self
    }

    /// Set the fare limit. `None`, zero and NaN all clear it.
    pub fn with_budget(mut self, limit: Option<f64>) -> Self {
        self.budget = limit.and_then(Budget::new);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preferences() {
        for preference in Preference::ALL {
            assert_eq!(Preference::parse(preference.as_str()), preference);
        }
    }

    #[test]
    fn unknown_preference_is_none() {
        assert_eq!(Preference::parse("cheapest"), Preference::None);
        assert_eq!(Preference::parse(""), Preference::None);
        assert_eq!(Preference::parse("LOWEST_FARE"), Preference::None);
    }

    #[test]
    fn falsy_budget_is_unbounded() {
        assert_eq!(Budget::new(0.0), None);
        assert_eq!(Budget::new(-0.0), None);
        assert_eq!(Budget::new(f64::NAN), None);
    }

    #[test]
    fn budget_is_inclusive() {
        let budget = Budget::new(4.0).unwrap();
        assert!(budget.allows(3.5));
        assert!(budget.allows(4.0));
        assert!(!budget.allows(4.01));
    }

    #[test]
    fn negative_budget_rejects_everything() {
        let budget = Budget::new(-1.0).unwrap();
        assert!(!budget.allows(0.0));
    }

    #[test]
    fn request_keeps_names_verbatim() {
        let request = SearchRequest::new("Bawaleshie", "Circle Overhead").unwrap();
        assert_eq!(request.origin, "Bawaleshie");
        assert_eq!(request.destination, "Circle Overhead");
        assert_eq!(request.preference, Preference::None);
        assert_eq!(request.budget, None);
    }

    #[test]
    fn blank_names_rejected() {
        assert_eq!(
            SearchRequest::new("", "Circle Overhead"),
            Err(DomainError::BlankStopName("origin"))
        );
        assert_eq!(
            SearchRequest::new("Bawaleshie", "   "),
            Err(DomainError::BlankStopName("destination"))
        );
    }

    #[test]
    fn with_budget_normalizes() {
        let request = SearchRequest::new("a", "b").unwrap();
        assert_eq!(request.clone().with_budget(Some(0.0)).budget, None);
        assert_eq!(request.clone().with_budget(None).budget, None);
        assert_eq!(
            request.with_budget(Some(4.0)).budget.map(Budget::limit),
            Some(4.0)
        );
    }
}
