// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// The single request/response operation shared by the HTTP
// route and the `predict` command:
//
//   payload ──► Feature Pipeline ──► model ──► label
//                    │ invalid
//                    └──────────────────────► "neutral"
//
// Neither a bad payload nor a backend failure is surfaced to the
// caller; both are logged and answered with the fallback label.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::emotion::FALLBACK_EMOTION;
use crate::domain::landmarks::LandmarkVector;
use crate::domain::traits::EmotionPredictor;

/// Classify a raw request body, degrading to the fallback label.
pub fn predict_emotion<P: EmotionPredictor + ?Sized>(predictor: &P, body: &Value) -> String {
    let landmarks = match LandmarkVector::from_body(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Rejected landmark payload: {e}");
            return FALLBACK_EMOTION.to_string();
        }
    };

    match predictor.predict(&landmarks) {
        Ok(prediction) => {
            tracing::debug!(
                "Predicted '{}' (class {}, confidence {:.3})",
                prediction.emotion,
                prediction.class_index,
                prediction.confidence()
            );
            prediction.emotion
        }
        Err(e) => {
            tracing::warn!("Inference failed, answering '{}': {e:#}", FALLBACK_EMOTION);
            FALLBACK_EMOTION.to_string()
        }
    }
}

/// Read a landmark file for the `predict` command.
///
/// Accepts either a request body `{"landmarks": [...]}` or a bare
/// JSON array, which is wrapped into a request body.
pub fn read_landmark_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read landmarks from '{}'", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))?;

    Ok(match value {
        Value::Array(_) => serde_json::json!({ "landmarks": value }),
        other => other,
    })
}
