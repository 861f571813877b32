//! HTTP route handlers.

use std::any::Any;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::matcher::RouteMatcher;
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;

/// Body returned for every server-side failure.
const GENERIC_ERROR: &str = "Something went wrong";

/// Create the application router.
///
/// Search routes only accept POST; other methods get 405 before any
/// handler runs.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search_routes))
        .route("/searchRoutes", post(search_routes))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stored routes for sub-trips from origin to destination.
async fn search_routes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchRoutesResponse>, AppError> {
    // Parse JSON manually so bad bodies are reported as client errors
    let req: SearchRoutesRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body_len = body.len(), "rejected search body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let request = req
        .into_search_request()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    let routes = state.store.list_routes().await?;

    let matcher = RouteMatcher::new(&state.matcher);
    let matches = matcher.search(&request, &routes);

    info!(
        origin = %request.origin,
        destination = %request.destination,
        preference = request.preference.as_str(),
        routes = routes.len(),
        results = matches.len(),
        "route search"
    );

    let results = matches.iter().map(MatchResultDto::from_match).collect();
    Ok(Json(SearchRoutesResponse { results }))
}

/// Render a panic during request handling as a generic 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::Internal {
        message: format!("panic while handling request: {detail}"),
    }
    .into_response()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: format!("route store read failed: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal details are logged, never sent to the client
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(status = %StatusCode::BAD_REQUEST, %message, "bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(status = %StatusCode::INTERNAL_SERVER_ERROR, %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR.to_string())
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
