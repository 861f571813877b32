//! Application state for the web layer.

use std::sync::Arc;

use crate::matcher::MatcherConfig;
use crate::store::RouteStore;

/// Shared application state.
///
/// Built once at startup and cloned into each request.
#[derive(Clone)]
pub struct AppState {
    /// Route storage
    pub store: Arc<dyn RouteStore>,

    /// Route matcher configuration
    pub matcher: Arc<MatcherConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: Arc<dyn RouteStore>, matcher: MatcherConfig) -> Self {
        Self {
            store,
            matcher: Arc::new(matcher),
        }
    }
}
