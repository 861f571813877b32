//! Web layer for the route lookup service.
//!
//! Accepts search requests over HTTP, validates them, reads the route
//! store and renders the matcher's output as JSON.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
