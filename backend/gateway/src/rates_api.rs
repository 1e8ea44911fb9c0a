//! Exchange-rate endpoint.

use std::sync::Arc;

use axum::{extract::State, response::Json};

use pondo_core::ExchangeRate;

use crate::server::AppState;

/// Handler for `GET /api/rates`.
///
/// Never errors: the provider substitutes its fallback constant when the
/// upstream source is down.
pub async fn get_rates(State(state): State<Arc<AppState>>) -> Json<ExchangeRate> {
    Json(state.rates.get_exchange_rates().await)
}
