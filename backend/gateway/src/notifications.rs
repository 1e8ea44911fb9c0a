//! Notification listing, read marking, and preference endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use pondo_core::NotificationKind;
use pondo_store::NotificationStore;

use crate::server::AppState;

/// Handler for `GET /api/users/{user_id}/notifications`. Newest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.store.notifications_for(user_id).await {
        Ok(notifications) => Ok(Json(json!({ "notifications": notifications }))),
        Err(e) => {
            tracing::error!(%user_id, error = %e, "failed to list notifications");
            Err(internal(e))
        }
    }
}

/// Handler for `POST /api/users/{user_id}/notifications/{notification_id}/read`.
///
/// The update is scoped to the acting user: marking someone else's
/// notification matches zero rows and reports `updated: false`.
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path((user_id, notification_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.store.mark_read(notification_id, user_id).await {
        Ok(affected) => Ok(Json(json!({ "updated": affected > 0 }))),
        Err(e) => {
            tracing::error!(%user_id, %notification_id, error = %e, "mark-read failed");
            Err(internal(e))
        }
    }
}

#[derive(Deserialize)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    #[serde(default)]
    pub metadata: Value,
}

/// Handler for `POST /api/users/{user_id}/notifications`.
///
/// Goes through the trigger helper, so the user's preference flag is
/// honored and delivery stays best-effort: a suppressed or failed insert
/// is reported as `delivered: false`, never as an error status.
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<NewNotification>,
) -> Json<Value> {
    let data = pondo_core::NotificationData {
        user_id,
        kind: body.kind,
        title: body.title,
        message: body.message,
        action_url: body.action_url,
        metadata: body.metadata,
    };
    match state.trigger.trigger(data).await {
        Some(record) => Json(json!({ "delivered": true, "notification": record })),
        None => Json(json!({ "delivered": false })),
    }
}

#[derive(Deserialize)]
pub struct PreferenceUpdate {
    pub kind: NotificationKind,
    pub enabled: bool,
}

/// Handler for `PUT /api/users/{user_id}/notifications/prefs`.
pub async fn set_preference(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(update): Json<PreferenceUpdate>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state
        .store
        .set_preference(user_id, update.kind, update.enabled)
        .await
    {
        Ok(()) => Ok(Json(json!({ "ok": true }))),
        Err(e) => {
            tracing::error!(%user_id, error = %e, "failed to set preference");
            Err(internal(e))
        }
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}
