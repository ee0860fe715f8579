// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Everything training hands over to serving lives in one
// directory:
//
//   checkpoints/
//     model.mpk               ← best weights (CompactRecorder)
//     train_config.json       ← architecture + hyperparameters
//     label_encoder.json      ← index ↔ emotion mapping
//     feature_scaler.json     ← per-feature mean / std
//     training_summary.json   ← best epoch and its accuracy
//     metrics.csv             ← per-epoch metrics (MetricsLogger)
//
// The config is needed to rebuild the exact architecture before
// the weights can be loaded into it; CompactRecorder is
// type-checked, so a mismatched architecture fails to load.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::label_encoder::LabelEncoder;
use crate::data::preprocessor::StandardScaler;
use crate::ml::model::EmotionClassifier;

const MODEL_FILE:   &str = "model";
const CONFIG_FILE:  &str = "train_config.json";
const ENCODER_FILE: &str = "label_encoder.json";
const SCALER_FILE:  &str = "feature_scaler.json";
const SUMMARY_FILE: &str = "training_summary.json";

/// Short record of which snapshot was persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub best_epoch:    usize,
    pub best_accuracy: f64,
    pub epochs_run:    usize,
    pub train_samples: usize,
    pub test_samples:  usize,
}

/// Manages saving and loading of training artifacts.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Open an existing checkpoint directory without creating it.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        anyhow::ensure!(
            dir.is_dir(),
            "Checkpoint directory '{}' does not exist. Have you run 'train' first?",
            dir.display()
        );
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn model_path(&self) -> PathBuf {
        // CompactRecorder appends its own extension
        self.dir.join(MODEL_FILE)
    }

    pub fn model_exists(&self) -> bool {
        self.model_path().with_extension("mpk").exists()
    }

    /// Save model weights (overwrites any previous model).
    pub fn save_model<B: Backend>(&self, model: &EmotionClassifier<B>) -> Result<()> {
        let path = self.model_path();
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;
        tracing::debug!("Saved model weights to '{}'", path.display());
        Ok(())
    }

    /// Load weights into a freshly initialised model of the same architecture.
    pub fn load_model<B: Backend>(
        &self,
        model:  EmotionClassifier<B>,
        device: &B::Device,
    ) -> Result<EmotionClassifier<B>> {
        let path = self.model_path();
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;
        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE)
    }

    pub fn save_label_encoder(&self, encoder: &LabelEncoder) -> Result<()> {
        self.write_json(ENCODER_FILE, encoder)
    }

    pub fn load_label_encoder(&self) -> Result<LabelEncoder> {
        self.read_json(ENCODER_FILE)
    }

    pub fn save_scaler(&self, scaler: &StandardScaler) -> Result<()> {
        self.write_json(SCALER_FILE, scaler)
    }

    pub fn load_scaler(&self) -> Result<StandardScaler> {
        self.read_json(SCALER_FILE)
    }

    pub fn save_summary(&self, summary: &TrainingSummary) -> Result<()> {
        self.write_json(SUMMARY_FILE, summary)
    }

    pub fn load_summary(&self) -> Result<TrainingSummary> {
        self.read_json(SUMMARY_FILE)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Wrote '{}'", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read '{}'. Make sure you have run 'train' first.",
                    path.display()
                )
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Corrupt '{}'", path.display()))
    }
}
