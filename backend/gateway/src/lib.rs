//! HTTP gateway for the Pondo backend.
//!
//! All handlers share one [`server::AppState`] built at startup; routes are
//! thin mappings from HTTP to the pipeline, aggregator, trigger, store, and
//! rate provider crates.

pub mod context;
pub mod notifications;
pub mod rates_api;
pub mod receipts;
pub mod server;
pub mod users;

pub use server::{build_router, start_server, AppState};
