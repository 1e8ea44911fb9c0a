//! Main HTTP gateway server and router.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

use pondo_context::ContextAggregator;
use pondo_notify::NotificationTrigger;
use pondo_receipt::{ReceiptScanner, MAX_IMAGE_BYTES};
use pondo_store::SqliteStore;
use rates::RateProvider;

use crate::{context, notifications, rates_api, receipts, users};

/// Shared application state for API handlers.
///
/// Everything here is constructed once at startup and handed to every
/// handler by reference; handlers never build their own clients.
pub struct AppState {
    pub store: Arc<SqliteStore>,
    pub scanner: ReceiptScanner,
    pub aggregator: ContextAggregator,
    pub trigger: NotificationTrigger,
    pub rates: RateProvider,
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/receipts/scan", post(receipts::scan_receipt))
        .route("/api/users/{user_id}/context", get(context::get_context))
        .route(
            "/api/users/{user_id}/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route(
            "/api/users/{user_id}/notifications/{notification_id}/read",
            post(notifications::mark_read),
        )
        .route(
            "/api/users/{user_id}/notifications/prefs",
            put(notifications::set_preference),
        )
        .route("/api/users/{user_id}/transactions", post(users::add_transaction))
        .route("/api/users/{user_id}/goals", post(users::add_goal))
        .route("/api/users/{user_id}/profile", put(users::upsert_profile))
        .route("/api/rates", get(rates_api::get_rates))
        // Axum's default 2MB body cap is below the documented image limit.
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024))
        .with_state(state)
}

/// Serves an already-built router on the given address. Callers layer
/// anything deployment-specific (CORS, tracing middleware) before handing
/// the router over.
pub async fn start_server(addr: SocketAddr, app: Router) -> Result<()> {
    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "pondo",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use pondo_receipt::providers::{MockModel, MockOcr};
    use tower::ServiceExt;
    use uuid::Uuid;

    const RECEIPT_JSON: &str = r#"{
        "merchant": "Jollibee Ayala Triangle",
        "amount": 185.50,
        "date": "2025-06-02",
        "items": ["Chickenjoy w/ Rice"],
        "category": "Food & Dining",
        "paymentMethod": "GCash"
    }"#;

    fn test_state() -> Arc<AppState> {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        Arc::new(AppState {
            store: store.clone(),
            scanner: ReceiptScanner::new(
                Arc::new(MockOcr::with_text("JOLLIBEE TOTAL 185.50 GCASH")),
                Arc::new(MockModel::with_response(RECEIPT_JSON)),
            ),
            aggregator: ContextAggregator::new(store.clone()),
            trigger: NotificationTrigger::new(store.clone()),
            rates: RateProvider::new().with_base_url("http://127.0.0.1:9/"),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "pondo");
    }

    #[tokio::test]
    async fn scan_returns_structured_receipt() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::post("/api/receipts/scan")
                    .header("content-type", "image/jpeg")
                    .body(Body::from(vec![0u8; 4096]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["receipt"]["merchant"], "Jollibee Ayala Triangle");
        assert_eq!(json["receipt"]["paymentMethod"], "GCash");
    }

    #[tokio::test]
    async fn scan_rejects_wrong_mime_before_pipeline() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::post("/api/receipts/scan")
                    .header("content-type", "application/pdf")
                    .body(Body::from(vec![0u8; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn scan_tags_failed_stage() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let state = Arc::new(AppState {
            store: store.clone(),
            scanner: ReceiptScanner::new(
                Arc::new(MockOcr::failing()),
                Arc::new(MockModel::with_response(RECEIPT_JSON)),
            ),
            aggregator: ContextAggregator::new(store.clone()),
            trigger: NotificationTrigger::new(store.clone()),
            rates: RateProvider::new(),
        });
        let response = build_router(state)
            .oneshot(
                Request::post("/api/receipts/scan")
                    .header("content-type", "image/png")
                    .body(Body::from(vec![0u8; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["stage"], "extraction");
    }

    #[tokio::test]
    async fn scan_error_never_echoes_credentials() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let state = Arc::new(AppState {
            store: store.clone(),
            scanner: ReceiptScanner::new(
                Arc::new(MockOcr::failing_with(
                    "upstream 403: GET /parse/image?key=AIzaSyD4m0ckk3yv4lu3AbCdEf",
                )),
                Arc::new(MockModel::with_response(RECEIPT_JSON)),
            ),
            aggregator: ContextAggregator::new(store.clone()),
            trigger: NotificationTrigger::new(store.clone()),
            rates: RateProvider::new(),
        });
        let response = build_router(state)
            .oneshot(
                Request::post("/api/receipts/scan")
                    .header("content-type", "image/png")
                    .body(Body::from(vec![0u8; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        let message = json["error"].as_str().unwrap();
        assert!(!message.contains("AIzaSyD4m0ckk3yv4lu3AbCdEf"));
        assert!(message.contains("[REDACTED_TOKEN]"));
    }

    #[tokio::test]
    async fn mark_read_for_other_user_reports_unchanged() {
        let state = test_state();
        let owner = Uuid::new_v4();
        let record = pondo_core::NotificationRecord {
            id: Uuid::new_v4(),
            user_id: owner,
            kind: pondo_core::NotificationKind::System,
            title: "t".into(),
            message: "m".into(),
            action_url: None,
            metadata: json!({}),
            is_read: false,
            created_at: chrono::Utc::now(),
        };
        use pondo_store::NotificationStore;
        state.store.insert_notification(record.clone()).await.unwrap();

        let intruder = Uuid::new_v4();
        let uri = format!("/api/users/{intruder}/notifications/{}/read", record.id);
        let response = build_router(state)
            .oneshot(Request::post(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["updated"], false);
    }

    #[tokio::test]
    async fn context_endpoint_renders_prompt() {
        let state = test_state();
        let user_id = Uuid::new_v4();
        use pondo_core::{ExpenseCategory, Transaction, TransactionKind};
        use pondo_store::UserDataStore;
        state
            .store
            .add_transaction(Transaction {
                id: Uuid::new_v4(),
                user_id,
                amount: 185.5,
                kind: TransactionKind::Expense,
                category: ExpenseCategory::FoodDining,
                merchant: Some("Jollibee".into()),
                date: chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            })
            .await
            .unwrap();

        let response = build_router(state)
            .oneshot(
                Request::get(format!("/api/users/{user_id}/context"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let prompt = body["prompt"].as_str().unwrap();
        assert!(prompt.contains("Transactions"));
        assert!(!prompt.contains("Goals"));
    }
}
