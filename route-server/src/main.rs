use std::sync::Arc;

use route_server::config::{ServerConfig, StoreKind};
use route_server::store::{
    CacheConfig, CachedRouteStore, FirestoreStore, JsonFileStore, RouteStore, StoreError,
};
use route_server::web::{AppState, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Open the route store
    let store = open_store(&config)?;

    // Check the store is readable (warn only: it may come up later)
    match store.list_routes().await {
        Ok(routes) => {
            let malformed = routes.iter().filter(|r| r.is_err()).count();
            info!(routes = routes.len(), malformed, "route store reachable");
        }
        Err(e) => warn!(error = %e, "route store not readable at startup"),
    }

    // Build app state
    let state = AppState::new(store, config.matcher_config());
    let app = create_router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(address = %listener.local_addr()?, "route server listening");
    info!("API Endpoints:");
    info!("  GET  /health         - Health check");
    info!("  POST /search         - Search routes");
    info!("  POST /searchRoutes   - Search routes (legacy path)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("route server stopped");
    Ok(())
}

/// Open the configured store, behind a snapshot cache unless disabled.
fn open_store(config: &ServerConfig) -> Result<Arc<dyn RouteStore>, StoreError> {
    match &config.store {
        StoreKind::File { path } => {
            info!(path = %path.display(), "using JSON file route store");
            Ok(with_cache(JsonFileStore::new(path), config))
        }
        StoreKind::Firestore(firestore) => {
            info!(
                project = %firestore.project_id,
                collection = %firestore.collection,
                "using Firestore route store"
            );
            Ok(with_cache(FirestoreStore::new(firestore.clone())?, config))
        }
    }
}

fn with_cache<S: RouteStore + 'static>(store: S, config: &ServerConfig) -> Arc<dyn RouteStore> {
    if config.cache_ttl.is_zero() {
        Arc::new(store)
    } else {
        Arc::new(CachedRouteStore::new(
            store,
            &CacheConfig {
                ttl: config.cache_ttl,
            },
        ))
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
