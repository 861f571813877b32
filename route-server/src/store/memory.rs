//! In-memory route store.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::domain::{RecordRead, RouteRecord};

use super::error::StoreError;
use super::{RouteSnapshot, RouteStore};

/// Store that serves a fixed snapshot.
///
/// Useful for tests and for running without any backing database.
#[derive(Debug, Clone, Default)]
pub struct MemoryRouteStore {
    routes: RouteSnapshot,
}

impl MemoryRouteStore {
    /// Create a store from already-decoded reads.
    pub fn new(routes: Vec<RecordRead>) -> Self {
        Self {
            routes: Arc::new(routes),
        }
    }

    /// Create a store holding only well-formed records.
    pub fn from_records(records: impl IntoIterator<Item = RouteRecord>) -> Self {
        Self::new(records.into_iter().map(Ok).collect())
    }

    /// Create a store by decoding raw documents, keyed by position.
    pub fn from_documents(documents: &[Value]) -> Self {
        Self::new(
            documents
                .iter()
                .enumerate()
                .map(|(idx, doc)| RouteRecord::from_document(&format!("#{idx}"), doc))
                .collect(),
        )
    }

    /// Number of documents held.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteStore for MemoryRouteStore {
    fn list_routes(&self) -> BoxFuture<'_, Result<RouteSnapshot, StoreError>> {
        let routes = Arc::clone(&self.routes);
        async move { Ok(routes) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn serves_snapshot() {
        let store = MemoryRouteStore::from_records([
            RouteRecord::new("a", "A", ["X", "Y"]),
            RouteRecord::new("b", "B", ["Y", "Z"]),
        ]);

        let routes = store.list_routes().await.unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].as_ref().unwrap().id.as_str(), "a");
    }

    #[tokio::test]
    async fn snapshot_is_shared() {
        let store = MemoryRouteStore::from_records([RouteRecord::new("a", "A", ["X"])]);

        let first = store.list_routes().await.unwrap();
        let second = store.list_routes().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn decodes_documents() {
        let store = MemoryRouteStore::from_documents(&[
            json!({ "id": "ok", "stops": ["A", "B"] }),
            json!({ "stops": 7 }),
        ]);

        let routes = store.list_routes().await.unwrap();

        assert!(routes[0].is_ok());
        let err = routes[1].as_ref().unwrap_err();
        assert_eq!(err.key, "#1");
        assert_eq!(err.reason, "stops is not an array");
    }

    #[tokio::test]
    async fn empty_store() {
        let store = MemoryRouteStore::default();
        assert!(store.is_empty());
        assert!(store.list_routes().await.unwrap().is_empty());
    }
}
