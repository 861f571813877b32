//! Matcher configuration.

/// Fare charged when a route document carries none.
pub const DEFAULT_FARE: f64 = 3.5;

/// Estimated minutes spent per stop on a sub-trip.
pub const DEFAULT_MINUTES_PER_STOP: u32 = 2;

/// Business parameters for route matching.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Fare used for routes without one.
    pub default_fare: f64,

    /// Minutes per stop in the travel-time estimate.
    /// A sub-trip's time is this value times its number of stops.
    pub minutes_per_stop: u32,
}

impl MatcherConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(default_fare: f64, minutes_per_stop: u32) -> Self {
        Self {
            default_fare,
            minutes_per_stop,
        }
    }

    /// Replace the fallback fare.
    pub fn with_default_fare(mut self, default_fare: f64) -> Self {
        self.default_fare = default_fare;
        self
    }

    /// Estimated travel time for a sub-trip of `stop_count` stops.
    pub fn estimate_time(&self, stop_count: usize) -> u32 {
        let stops = u32::try_from(stop_count).unwrap_or(u32::MAX);
        self.minutes_per_stop.saturating_mul(stops)
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            default_fare: DEFAULT_FARE,
            minutes_per_stop: DEFAULT_MINUTES_PER_STOP,
        }
    }
}
