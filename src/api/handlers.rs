// ============================================================
// Layer 7 — Request Handlers
// ============================================================
// Thin adapters from HTTP to the predict use case. Every
// /predict request gets a 200 with an emotion label.

use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::state::AppState;
use crate::application::predict_use_case::predict_emotion;
use crate::domain::emotion::FALLBACK_EMOTION;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub emotion: String,
}

/// `POST /predict` — always 200 with `{"emotion": ...}`.
///
/// The body is taken as raw bytes rather than `Json<T>` so that a
/// body which is not JSON at all also gets the fallback label
/// instead of an extractor rejection.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> Json<PredictResponse> {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let predictor = state.predictor();

    // Model evaluation is CPU/GPU bound; keep it off the async workers
    let emotion = tokio::task::spawn_blocking(move || {
        let predictor = predictor.lock();
        predict_emotion(&*predictor, &body)
    })
    .await
    .unwrap_or_else(|e| {
        tracing::warn!("Prediction task failed: {e}");
        FALLBACK_EMOTION.to_string()
    });

    Json(PredictResponse { emotion })
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
