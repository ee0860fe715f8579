// ============================================================
// Layer 7 — Service State
// ============================================================
// Everything a request handler needs, built exactly once before
// the listener opens:
//
//   Loading ── from_checkpoint() ──► Ready (serving forever)
//
// If loading fails the process exits; there is no path back to
// Loading short of a restart, and no hot-swap of weights.
//
// burn modules are Send but not guaranteed Sync, so the
// predictor sits behind a mutex. The model itself is never
// mutated after loading.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use crate::domain::traits::EmotionPredictor;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

#[derive(Clone)]
pub struct AppState {
    predictor: Arc<Mutex<dyn EmotionPredictor>>,
}

impl AppState {
    /// Wrap any predictor (the real model, or a test stub).
    pub fn new<P: EmotionPredictor + 'static>(predictor: P) -> Self {
        Self { predictor: Arc::new(Mutex::new(predictor)) }
    }

    /// Load the trained model and its label encoder.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, standardize_input: bool) -> Result<Self> {
        tracing::info!("Loading model from '{}'", ckpt_manager.dir().display());
        let inferencer = Inferencer::from_checkpoint(ckpt_manager, standardize_input)?;
        tracing::info!("Model ready");
        Ok(Self::new(inferencer))
    }

    pub fn predictor(&self) -> Arc<Mutex<dyn EmotionPredictor>> {
        Arc::clone(&self.predictor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::predict_use_case::predict_emotion;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::domain::emotion::is_servable_label;
    use crate::domain::landmarks::LANDMARK_FEATURES;
    use serde_json::json;
    use std::fmt::Write as _;
    use std::path::Path;

    /// Landmark CSV with `width` feature columns and three labels.
    fn write_csv(path: &Path, width: usize, rows: usize) {
        let mut s: String = (0..width).map(|i| format!("f{i},")).collect();
        s.push_str("label\n");
        for r in 0..rows {
            let label = ["angry", "happy", "sad"][r % 3];
            for c in 0..width {
                write!(s, "{},", ((r * 7 + c) as f32 * 0.01).sin() + (r % 3) as f32).unwrap();
            }
            writeln!(s, "{label}").unwrap();
        }
        std::fs::write(path, s).unwrap();
    }

    fn train(dir: &Path, width: usize) -> CheckpointManager {
        write_csv(&dir.join("train.csv"), width, 12);
        write_csv(&dir.join("test.csv"), width, 6);
        let cfg = TrainConfig {
            train_csv:      dir.join("train.csv").to_string_lossy().into_owned(),
            test_csv:       dir.join("test.csv").to_string_lossy().into_owned(),
            checkpoint_dir: dir.join("ckpt").to_string_lossy().into_owned(),
            embed_dim:      8,
            num_heads:      2,
            ff_dim:         16,
            num_layers:     1,
            epochs:         1,
            batch_size:     4,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg).execute().unwrap();
        CheckpointManager::open(dir.join("ckpt")).unwrap()
    }

    #[test]
    fn test_trained_checkpoint_serves_predictions() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = train(dir.path(), LANDMARK_FEATURES);

        for standardize_input in [false, true] {
            let state     = AppState::from_checkpoint(&ckpt, standardize_input).unwrap();
            let predictor = state.predictor();
            let body      = json!({ "landmarks": vec![0.0; LANDMARK_FEATURES] });
            let label     = predict_emotion(&*predictor.lock(), &body);
            assert!(is_servable_label(&label), "unexpected label {label}");
        }
    }

    #[test]
    fn test_checkpoint_of_other_width_is_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = train(dir.path(), 4);

        let err = AppState::from_checkpoint(&ckpt, false).err().unwrap();
        assert!(format!("{err:#}").contains("1404"));
    }
}
