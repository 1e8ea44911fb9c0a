//! User financial-context endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use pondo_context::render_prompt;

use crate::server::AppState;

/// Handler for `GET /api/users/{user_id}/context`.
///
/// All-or-nothing: a failed underlying read is a 502, never a partial
/// summary.
pub async fn get_context(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.aggregator.build(user_id).await {
        Ok(summary) => {
            let prompt = render_prompt(&summary);
            Ok(Json(json!({ "summary": summary, "prompt": prompt })))
        }
        Err(e) => {
            tracing::error!(%user_id, error = %e, "context build failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}
