//! Transit route lookup server.
//!
//! A web service that answers: "Which routes take me from this stop
//! to that one, and which is cheapest or quickest?"

pub mod config;
pub mod domain;
pub mod matcher;
pub mod store;
pub mod web;
