// ============================================================
// Layer 3 — Emotion Domain Types
// ============================================================
// The label vocabulary of the classifier and the shape of a
// single prediction.
//
// The index → name mapping itself is NOT hardcoded here.
// Training fits a LabelEncoder and persists it; serving loads
// that same file. This module only names the labels the
// service can ever answer with, so callers and tests can
// check membership.

use serde::{Deserialize, Serialize};

/// The seven emotions the training data is labelled with.
pub const KNOWN_EMOTIONS: [&str; 7] = [
    "happy", "sad", "angry", "neutral", "surprise", "fear", "disgust",
];

/// Returned whenever the landmark payload can't be used.
pub const FALLBACK_EMOTION: &str = "neutral";

/// Returned when the model picks a class index the encoder never saw.
pub const UNKNOWN_EMOTION: &str = "unknown";

/// Default number of output classes (one logit per emotion).
pub const NUM_EMOTIONS: usize = KNOWN_EMOTIONS.len();

/// True for any label the HTTP service is allowed to return.
pub fn is_servable_label(label: &str) -> bool {
    label == UNKNOWN_EMOTION || KNOWN_EMOTIONS.contains(&label)
}

/// Result of classifying one landmark vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Argmax class index over the logits
    pub class_index: usize,

    /// Decoded label, or "unknown" if the index has no mapping
    pub emotion: String,

    /// Raw, unnormalised model outputs
    pub logits: Vec<f32>,
}

impl Prediction {
    /// Softmax over the logits. Useful for logging confidence.
    pub fn probabilities(&self) -> Vec<f32> {
        let max = self
            .logits
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = self.logits.iter().map(|l| (l - max).exp()).collect();
        let sum: f32 = exps.iter().sum();
        exps.into_iter().map(|e| e / sum).collect()
    }

    pub fn confidence(&self) -> f32 {
        self.probabilities()
            .get(self.class_index)
            .copied()
            .unwrap_or(0.0)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servable_labels() {
        for label in KNOWN_EMOTIONS {
            assert!(is_servable_label(label));
        }
        assert!(is_servable_label("unknown"));
        assert!(!is_servable_label("bored"));
        assert!(!is_servable_label(""));
    }

    #[test]
    fn test_fallback_is_a_known_emotion() {
        assert!(KNOWN_EMOTIONS.contains(&FALLBACK_EMOTION));
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let p = Prediction {
            class_index: 2,
            emotion:     "angry".to_string(),
            logits:      vec![0.1, -1.0, 3.0, 0.5],
        };
        let probs = p.probabilities();
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        // The argmax logit also has the highest probability
        assert!(p.confidence() > 0.5);
    }
}
