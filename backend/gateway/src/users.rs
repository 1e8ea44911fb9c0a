//! Minimal write surface for user-owned financial records.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use pondo_core::{ExpenseCategory, Goal, Profile, Transaction, TransactionKind};
use pondo_store::UserDataStore;

use crate::server::AppState;

#[derive(Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: ExpenseCategory,
    pub merchant: Option<String>,
    pub date: NaiveDate,
}

/// Handler for `POST /api/users/{user_id}/transactions`.
pub async fn add_transaction(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<NewTransaction>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.amount < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "amount must be non-negative" })),
        ));
    }

    let tx = Transaction {
        id: Uuid::new_v4(),
        user_id,
        amount: body.amount,
        kind: body.kind,
        category: body.category,
        merchant: body.merchant,
        date: body.date,
    };

    match state.store.add_transaction(tx.clone()).await {
        Ok(()) => Ok(Json(json!({ "transaction": tx }))),
        Err(e) => {
            tracing::error!(%user_id, error = %e, "failed to add transaction");
            Err(internal(e))
        }
    }
}

#[derive(Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub saved_amount: f64,
}

/// Handler for `POST /api/users/{user_id}/goals`.
pub async fn add_goal(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<NewGoal>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let goal = Goal {
        id: Uuid::new_v4(),
        user_id,
        name: body.name,
        target_amount: body.target_amount,
        saved_amount: body.saved_amount,
    };

    match state.store.add_goal(goal.clone()).await {
        Ok(()) => {
            // Best-effort; a dropped notification never fails the write.
            let congrats = pondo_notify::builders::achievement(
                user_id,
                &format!("Started a goal: {}", goal.name),
            );
            state.trigger.trigger(congrats).await;
            Ok(Json(json!({ "goal": goal })))
        }
        Err(e) => {
            tracing::error!(%user_id, error = %e, "failed to add goal");
            Err(internal(e))
        }
    }
}

#[derive(Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub age: Option<u32>,
    pub monthly_income: Option<f64>,
}

/// Handler for `PUT /api/users/{user_id}/profile`.
pub async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let profile = Profile {
        user_id,
        name: body.name,
        age: body.age,
        monthly_income: body.monthly_income,
    };

    match state.store.upsert_profile(profile.clone()).await {
        Ok(()) => Ok(Json(json!({ "profile": profile }))),
        Err(e) => {
            tracing::error!(%user_id, error = %e, "failed to upsert profile");
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
