//! HTTP routes.
//!
//! - `POST /predict`  `{"text": "..."}` → plain-text label
//! - `POST /feedback` `{"execution_datetime": "...", "feedback": "Yes" | "No"}` → 204
//! - `GET  /health`   → `ok`

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use hatescan_types::Feedback;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::service::PredictionService;
use crate::store::{PredictionStore, StoreError};

/// Response header naming the stored prediction, used as the feedback key.
pub const EXECUTION_DATETIME_HEADER: &str = "x-execution-datetime";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    /// `None` when no database is configured.
    pub store: Option<Arc<dyn PredictionStore>>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub execution_datetime: DateTime<Utc>,
    pub feedback: Feedback,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/feedback", post(feedback))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Response, (StatusCode, String)> {
    let label = state.service.predict(&request.text).await.map_err(|e| {
        error!("Prediction failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("prediction failed: {e}"))
    })?;

    let mut response = label.as_str().into_response();

    if let Some(store) = &state.store {
        let record = store.record(&request.text, label).await.map_err(|e| {
            error!("Failed to record prediction: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to record prediction".to_string(),
            )
        })?;

        let stamp = record
            .execution_datetime
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        let value = HeaderValue::from_str(&stamp).map_err(|e| {
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
        response
            .headers_mut()
            .insert(EXECUTION_DATETIME_HEADER, value);
    }

    Ok(response)
}

async fn feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let Some(store) = &state.store else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "prediction log is not configured".to_string(),
        ));
    };

    match store
        .add_feedback(request.execution_datetime, request.feedback)
        .await
    {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e @ StoreError::NotFound(_)) => Err((StatusCode::NOT_FOUND, e.to_string())),
        Err(e @ StoreError::FeedbackAlreadyRecorded(_)) => {
            warn!("{}", e);
            Err((StatusCode::CONFLICT, e.to_string()))
        }
        Err(e @ StoreError::Database(_)) => {
            error!("Failed to record feedback: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to record feedback".to_string(),
            ))
        }
    }
}

async fn health() -> &'static str {
    "ok"
}
