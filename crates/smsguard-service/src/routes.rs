//! HTTP routes and handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use smsguard_core::Label;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::state::AppState;

/// Per-request processing budget
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .route("/predict", post(predict))
        .fallback(fallback)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Prediction request body
#[derive(Debug, Deserialize)]
struct PredictRequest {
    /// The message to classify
    #[serde(default)]
    sms: Option<String>,
}

/// Prediction response body
#[derive(Debug, Serialize)]
struct PredictResponse {
    /// Predicted label, `spam` or `ham`
    result: Label,

    /// Identifier of the classifier that produced the result
    classifier: String,

    /// The original input, echoed back verbatim
    sms: String,
}

/// Classify a single SMS message
async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let request_id = Uuid::new_v4();
    metrics::counter!("smsguard_requests_total").increment(1);

    let sms = match req.sms {
        Some(s) if !s.trim().is_empty() => s,
        Some(_) => {
            return Err(AppError::InvalidRequest(
                "`sms` must be a non-empty string".to_string(),
            ))
        }
        None => {
            return Err(AppError::InvalidRequest(
                "missing required field `sms`".to_string(),
            ))
        }
    };

    let prediction = state.classifier.classify(&sms).map_err(|e| {
        error!(%request_id, error = %e, "classification failed");
        AppError::Internal
    })?;

    metrics::counter!("smsguard_predictions_total", "label" => prediction.label.as_str())
        .increment(1);
    metrics::histogram!("smsguard_inference_latency_us").record(prediction.latency_us as f64);

    info!(
        %request_id,
        label = %prediction.label,
        latency_us = prediction.latency_us,
        "prediction complete"
    );

    Ok(Json(PredictResponse {
        result: prediction.label,
        classifier: prediction.classifier,
        sms,
    }))
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error handling
#[derive(Debug)]
enum AppError {
    InvalidRequest(String),
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request_error", msg),
            // Details stay in the log; the client gets a generic message.
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "prediction failed".to_string(),
            ),
        };

        metrics::counter!("smsguard_errors_total", "kind" => kind).increment(1);

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
