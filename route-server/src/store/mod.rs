//! Route storage.
//!
//! The matcher never talks to a database directly: it is handed a
//! [`RouteSnapshot`] obtained from a [`RouteStore`]. Stores return every
//! route they hold; no filtering is pushed down.
//!
//! Implementations:
//! - [`JsonFileStore`]: a collection kept as a JSON array on disk
//! - [`FirestoreStore`]: the `routes` collection of a Firestore database
//! - [`MemoryRouteStore`]: a fixed in-memory snapshot
//! - [`CachedRouteStore`]: a TTL cache in front of any other store

mod cache;
mod error;
mod file;
mod firestore;
mod memory;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::domain::RecordRead;

pub use cache::{CacheConfig, CachedRouteStore};
pub use error::StoreError;
pub use file::JsonFileStore;
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryRouteStore;

/// Immutable view of every stored route, one entry per document.
pub type RouteSnapshot = Arc<Vec<RecordRead>>;

/// Source of route records.
///
/// This abstraction allows the gateway to be tested with in-memory data
/// and deployed against a file or a remote document database.
pub trait RouteStore: Send + Sync {
    /// Read every route in the store.
    ///
    /// Documents that cannot be decoded are returned as `Err` entries
    /// rather than failing the whole read.
    fn list_routes(&self) -> BoxFuture<'_, Result<RouteSnapshot, StoreError>>;
}

impl<S: RouteStore + ?Sized> RouteStore for Arc<S> {
    fn list_routes(&self) -> BoxFuture<'_, Result<RouteSnapshot, StoreError>> {
        (**self).list_routes()
    }
}
