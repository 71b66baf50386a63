//! REST API Server for the financial assistant
//!
//! Exposes the chat pipeline, the budget engine and the transaction list
//! to the frontend UI.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::data_prep;
use crate::error::AssistantError;
use crate::pipeline::AssistantPipeline;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub context: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SmartSpendRequest {
    pub amount: Decimal,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct NewTransactionRequest {
    pub amount: Decimal,
    pub category: String,
    pub merchant: String,
    pub date: Option<NaiveDate>,
}

/// =============================
/// Error Envelope
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ApiResponse::error(message))).into_response()
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<AssistantPipeline>,
}

/// =============================
/// Service Endpoints
/// =============================

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Financial Digital Twin API"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat_handler(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    info!(message_len = req.message.len(), "Received chat request");

    let reply = state.pipeline.handle_chat(&req.message).await;

    Json(ChatResponse {
        response: reply.response,
        context: reply.context,
    })
}

/// =============================
/// Budget Endpoint
/// =============================

async fn smartspend_handler(
    State(state): State<ApiState>,
    Json(req): Json<SmartSpendRequest>,
) -> Response {
    let decision = state.pipeline.check_budget(req.amount, &req.category);
    Json(decision).into_response()
}

/// =============================
/// Transaction Endpoints
/// =============================

async fn list_spending(State(state): State<ApiState>) -> Response {
    match state.pipeline.transactions().store().list_all().await {
        Ok(records) => Json(data_prep::clean_data(&records)).into_response(),
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load transactions: {}", e),
            )
        }
    }
}

async fn spending_risk(State(state): State<ApiState>) -> Response {
    match state.pipeline.analyze_spending_risk().await {
        Ok(analysis) => Json(analysis).into_response(),
        Err(e) => {
            error!("Spending risk analysis failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load transactions: {}", e),
            )
        }
    }
}

async fn create_transaction(
    State(state): State<ApiState>,
    Json(req): Json<NewTransactionRequest>,
) -> Response {
    let result = state
        .pipeline
        .transactions()
        .add_transaction(req.amount, req.category, req.merchant, req.date)
        .await;

    match result {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(AssistantError::InvalidInput(message)) => {
            error_response(StatusCode::BAD_REQUEST, message)
        }
        Err(e) => {
            error!("Failed to create transaction: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to save transaction: {}", e),
            )
        }
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(pipeline: Arc<AssistantPipeline>) -> Router {
    let state = ApiState { pipeline };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/chat", post(chat_handler))
        .route("/api/smartspend", post(smartspend_handler))
        .route("/api/spending", get(list_spending))
        .route("/api/spending/risk", get(spending_risk))
        .route("/api/transactions", post(create_transaction))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    pipeline: Arc<AssistantPipeline>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(pipeline);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generative::TextGenerator;
    use crate::models::TransactionRecord;
    use crate::store::InMemoryTransactionStore;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct CannedGenerator;

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> crate::Result<String> {
            Ok("Keep an emergency fund.".to_string())
        }
    }

    fn router() -> Router {
        let pipeline = AssistantPipeline::new(
            Arc::new(InMemoryTransactionStore::new()),
            Arc::new(CannedGenerator),
        );
        create_router(Arc::new(pipeline))
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_records_transaction() {
        let app = router();

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/chat",
                serde_json::json!({ "message": "Spent $12.50 on Transport at uber trip" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert!(body["response"].as_str().unwrap().contains("Recorded transaction"));
        assert_eq!(body["context"], serde_json::json!([]));

        let listed = app
            .oneshot(Request::get("/api/spending").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let records: Vec<TransactionRecord> =
            serde_json::from_value(read_json(listed).await).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].merchant, "Uber");
        assert_eq!(records[0].category, "Transport");
    }

    #[tokio::test]
    async fn test_chat_advice_carries_context() {
        let response = router()
            .oneshot(json_post(
                "/api/chat",
                serde_json::json!({ "message": "what are interest rates like" }),
            ))
            .await
            .unwrap();

        let body = read_json(response).await;
        assert_eq!(body["response"], "Keep an emergency fund.");
        assert!(!body["context"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_smartspend_over_limit() {
        let response = router()
            .oneshot(json_post(
                "/api/smartspend",
                serde_json::json!({ "amount": 600, "category": "Food" }),
            ))
            .await
            .unwrap();

        let body = read_json(response).await;
        assert_eq!(body["allowed"], false);
        assert!(body["alert"].as_str().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_negative_amount() {
        let response = router()
            .oneshot(json_post(
                "/api/transactions",
                serde_json::json!({
                    "amount": -3.5,
                    "category": "Food",
                    "merchant": "Cafe"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_transaction_with_date() {
        let response = router()
            .oneshot(json_post(
                "/api/transactions",
                serde_json::json!({
                    "amount": 45.0,
                    "category": "Groceries",
                    "merchant": "Whole Foods Market",
                    "date": "2023-10-28"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["date"], "2023-10-28");
        assert_eq!(body["merchant"], "Whole Foods Market");
    }

    #[tokio::test]
    async fn test_spending_risk_falls_back_on_prose_answer() {
        let response = router()
            .oneshot(Request::get("/api/spending/risk").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["risk_level"], "Unknown");
        assert_eq!(body["reasoning"], "Could not parse AI response");
        assert_eq!(body["raw"], "Keep an emergency fund.");
    }
}
