//! Domain types for the route lookup service.
//!
//! Stored routes are decoded one document at a time into a [`RecordRead`],
//! so a single bad document never hides the rest of the collection.
//! Requests are validated at construction; code that receives a
//! [`SearchRequest`] can rely on non-blank stop names.

mod error;
mod match_result;
mod request;
mod route;

pub use error::DomainError;
pub use match_result::MatchResult;
pub use request::{Budget, Preference, SearchRequest};
pub use route::{MalformedRecord, RecordRead, RouteId, RouteRecord};
