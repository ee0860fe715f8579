// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The HTTP layer and the `predict` command only need "something
// that turns a landmark vector into a Prediction". Programming
// against this trait keeps burn out of the API layer and lets
// the router be tested with a stub predictor.

use anyhow::Result;

use crate::domain::emotion::Prediction;
use crate::domain::landmarks::LandmarkVector;

// ─── EmotionPredictor ─────────────────────────────────────────────────────────
/// Any component that can classify a validated landmark vector.
///
/// Implementations:
///   - Inferencer → runs the trained transformer
///   - (tests) fixed-answer stubs
pub trait EmotionPredictor: Send {
    /// Classify one landmark vector.
    fn predict(&self, landmarks: &LandmarkVector) -> Result<Prediction>;
}
