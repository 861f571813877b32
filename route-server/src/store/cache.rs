//! Caching layer for route snapshots.
//!
//! Every search reads the whole collection. Caching the decoded snapshot
//! for a short TTL keeps a remote store from being read once per request,
//! at the cost of new routes appearing up to one TTL late.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use moka::future::Cache as MokaCache;
use tracing::debug;

use super::error::StoreError;
use super::{RouteSnapshot, RouteStore};

/// Configuration for the snapshot cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for the cached snapshot.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
        }
    }
}

/// Route store with caching.
///
/// Wraps another store and caches its snapshot. Failed reads are not
/// cached; concurrent misses share a single read of the inner store.
pub struct CachedRouteStore<S> {
    inner: S,
    snapshot: MokaCache<(), RouteSnapshot>,
}

impl<S: RouteStore> CachedRouteStore<S> {
    /// Create a new cached store.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let snapshot = MokaCache::builder().time_to_live(config.ttl).build();

        Self { inner, snapshot }
    }
}

impl<S: RouteStore> RouteStore for CachedRouteStore<S> {
    fn list_routes(&self) -> BoxFuture<'_, Result<RouteSnapshot, StoreError>> {
        async move {
            self.snapshot
                .try_get_with((), async {
                    debug!("route snapshot cache miss");
                    self.inner.list_routes().await
                })
                .await
                .map_err(|shared: Arc<StoreError>| {
                    Arc::try_unwrap(shared).unwrap_or_else(|shared| StoreError::Unavailable {
                        message: shared.to_string(),
                    })
                })
        }
        .boxed()
    }
}
