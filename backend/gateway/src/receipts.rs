//! Receipt scan endpoint: raw image body in, structured record out.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use logging::redact_sensitive;
use pondo_core::{ImagePayload, PondoError};

use crate::server::AppState;

/// Handler for `POST /api/receipts/scan`.
///
/// The body is the raw image; the MIME type comes from the Content-Type
/// header. Size and type are rejected with 400 before the pipeline runs;
/// pipeline failures come back as 422 with the failing stage attached.
pub async fn scan_receipt(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mime_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .unwrap_or_default();

    info!(bytes = body.len(), mime = %mime_type, "receipt scan requested");

    let image = ImagePayload {
        bytes: body.to_vec(),
        mime_type,
    };

    match state.scanner.scan(&image).await {
        Ok(record) => Ok(Json(json!({ "receipt": record }))),
        Err(e @ PondoError::InvalidImage(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )),
        Err(e) => {
            // Provider errors can echo upstream request details, which may
            // carry an API key. Scrub before logging or returning.
            let message = redact_sensitive(&e.to_string());
            warn!(error = %message, stage = ?e.stage(), "receipt scan failed");
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": message, "stage": e.stage() })),
            ))
        }
    }
}
