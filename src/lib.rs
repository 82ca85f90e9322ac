//! dalil: a REST service for task records.
//!
//! The interesting parts are the request-scoped parameter store
//! ([`scope`]), the path parameter extraction middleware
//! ([`api::middleware`]) and the in-memory repository
//! ([`tasks::repository`]).

pub mod api;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod scope;
pub mod tasks;
