// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load train / test CSVs        (Layer 4 - data)
//   Step 2: Fit scaler on train, apply    (Layer 4 - data)
//           to both splits
//   Step 3: Fit label encoder on train,   (Layer 4 - data)
//           encode both splits
//   Step 4: Save config, encoder, scaler  (Layer 6 - infra)
//   Step 5: Build burn datasets           (Layer 4 - data)
//   Step 6: Run training loop             (Layer 5 - ml)
//   Step 7: Save training summary         (Layer 6 - infra)
//
// Reference: Burn Book §5 (Training)

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::FaceMeshDataset,
    label_encoder::LabelEncoder,
    loader::load_labeled_csv,
    preprocessor::StandardScaler,
};
use crate::domain::emotion::NUM_EMOTIONS;
use crate::domain::landmarks::LANDMARK_FEATURES;
use crate::infra::checkpoint::{CheckpointManager, TrainingSummary};
use crate::ml::model::EmotionClassifierConfig;
use crate::ml::trainer::{run_training, TrainingReport};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Saved next to the weights
// so the server can rebuild the same architecture.
//
// Paths are stored already resolved against the deployment root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_csv:         String,
    pub test_csv:          String,
    pub checkpoint_dir:    String,
    /// Feature width D; overwritten with the CSV's width before saving
    pub input_size:        usize,
    pub embed_dim:         usize,
    pub num_heads:         usize,
    pub ff_dim:            usize,
    pub num_layers:        usize,
    pub num_classes:       usize,
    pub embedding_dropout: f64,
    pub dropout:           f64,
    pub batch_size:        usize,
    pub epochs:            usize,
    pub lr:                f64,
    pub weight_decay:      f64,
    pub lr_factor:         f64,
    pub lr_patience:       usize,
    pub seed:              u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_csv:         "data/train_faces_mesh.csv".to_string(),
            test_csv:          "data/test_faces_mesh.csv".to_string(),
            checkpoint_dir:    "checkpoints".to_string(),
            input_size:        LANDMARK_FEATURES,
            embed_dim:         128,
            num_heads:         4,
            ff_dim:            256,
            num_layers:        4,
            num_classes:       NUM_EMOTIONS,
            embedding_dropout: 0.3,
            dropout:           0.2,
            batch_size:        32,
            epochs:            5,
            lr:                1e-3,
            weight_decay:      1e-5,
            lr_factor:         0.5,
            lr_patience:       2,
            seed:              42,
        }
    }
}

impl TrainConfig {
    /// Architecture config for burn's model builder.
    pub fn model_config(&self) -> EmotionClassifierConfig {
        EmotionClassifierConfig::new(self.input_size)
            .with_embed_dim(self.embed_dim)
            .with_num_heads(self.num_heads)
            .with_ff_dim(self.ff_dim)
            .with_num_classes(self.num_classes)
            .with_num_layers(self.num_layers)
            .with_embedding_dropout(self.embedding_dropout)
            .with_block_dropout(self.dropout)
    }

    /// Reject configurations burn would panic on.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.num_heads > 0, "num_heads must be at least 1");
        ensure!(
            self.embed_dim % self.num_heads == 0,
            "embed_dim ({}) must be divisible by num_heads ({})",
            self.embed_dim,
            self.num_heads
        );
        ensure!((0.0..1.0).contains(&self.dropout), "dropout must be in [0, 1)");
        ensure!(
            (0.0..1.0).contains(&self.embedding_dropout),
            "embedding_dropout must be in [0, 1)"
        );
        ensure!(self.lr > 0.0, "lr must be positive");
        ensure!(
            self.lr_factor > 0.0 && self.lr_factor < 1.0,
            "lr_factor must be in (0, 1)"
        );
        ensure!(self.num_classes > 0, "num_classes must be at least 1");
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingReport> {
        let mut cfg = self.config.clone();
        cfg.validate()?;

        // ── Step 1: Load both splits ──────────────────────────────────────────
        let train = load_labeled_csv(&cfg.train_csv).context("Loading training split")?;
        let test  = load_labeled_csv(&cfg.test_csv).context("Loading test split")?;
        ensure!(
            train.num_features() == test.num_features(),
            "train split has {} features but test split has {}",
            train.num_features(),
            test.num_features()
        );
        if train.num_features() != LANDMARK_FEATURES {
            tracing::warn!(
                "Training on {} features; the HTTP service only accepts {}",
                train.num_features(),
                LANDMARK_FEATURES
            );
        }
        cfg.input_size = train.num_features();

        // ── Step 2: Standardise features (fit on train only) ──────────────────
        let (scaler, train_x) = StandardScaler::fit_transform(&train.features)?;
        let test_x = scaler.transform(&test.features)?;

        // ── Step 3: Encode labels ─────────────────────────────────────────────
        let encoder = LabelEncoder::fit(&train.labels)?;
        ensure!(
            encoder.num_classes() <= cfg.num_classes,
            "training data has {} classes but the model only has {} outputs",
            encoder.num_classes(),
            cfg.num_classes
        );
        let train_y = encoder.transform(&train.labels)?;
        let test_y  = encoder
            .transform(&test.labels)
            .context("Test split contains a label not present in the training split")?;
        tracing::info!("Classes: {:?}", encoder.classes());

        // ── Step 4: Persist everything serving needs ──────────────────────────
        let ckpt_manager = CheckpointManager::new(PathBuf::from(&cfg.checkpoint_dir));
        ckpt_manager.save_config(&cfg)?;
        ckpt_manager.save_label_encoder(&encoder)?;
        ckpt_manager.save_scaler(&scaler)?;

        // ── Step 5: Build burn datasets ───────────────────────────────────────
        let train_dataset = FaceMeshDataset::from_parts(train_x, train_y);
        let test_dataset  = FaceMeshDataset::from_parts(test_x, test_y);
        let train_samples = train_dataset.sample_count();
        let test_samples  = test_dataset.sample_count();
        tracing::info!(
            "Split: {} train, {} test; train class counts {:?}",
            train_samples,
            test_samples,
            train_dataset.class_counts(encoder.num_classes())
        );

        // ── Step 6: Train ─────────────────────────────────────────────────────
        let report = run_training(&cfg, train_dataset, test_dataset, &ckpt_manager)?;

        // ── Step 7: Summary ───────────────────────────────────────────────────
        ckpt_manager.save_summary(&TrainingSummary {
            best_epoch:    report.best_epoch,
            best_accuracy: report.best_accuracy,
            epochs_run:    report.history.len(),
            train_samples,
            test_samples,
        })?;

        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    /// Write a small CSV where the label is decided by feature 0.
    fn write_csv(path: &std::path::Path, rows: usize, offset: usize) {
        let mut s = String::from("f0,f1,f2,f3,label\n");
        for i in 0..rows {
            let k = i + offset;
            let (x0, label) = if k % 2 == 0 { (-1.5, "sad") } else { (1.5, "happy") };
            let wobble = (k as f32 * 0.7).sin() * 0.2;
            writeln!(s, "{},{},{},{},{}", x0 + wobble, wobble, 0.3, -wobble, label).unwrap();
        }
        std::fs::write(path, s).unwrap();
    }

    fn tiny_config(dir: &std::path::Path) -> TrainConfig {
        TrainConfig {
            train_csv:      dir.join("train.csv").to_string_lossy().into_owned(),
            test_csv:       dir.join("test.csv").to_string_lossy().into_owned(),
            checkpoint_dir: dir.join("ckpt").to_string_lossy().into_owned(),
            embed_dim:      8,
            num_heads:      2,
            ff_dim:         16,
            num_layers:     1,
            epochs:         2,
            batch_size:     4,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_reference_hyperparameters() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.epochs, 5);
        assert_eq!(cfg.lr, 1e-3);
        assert_eq!(cfg.weight_decay, 1e-5);
        assert_eq!(cfg.lr_factor, 0.5);
        assert_eq!(cfg.lr_patience, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_indivisible_heads() {
        let cfg = TrainConfig { embed_dim: 10, num_heads: 4, ..TrainConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_execute_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("train.csv"), 24, 0);
        write_csv(&dir.path().join("test.csv"), 8, 100);

        let cfg    = tiny_config(dir.path());
        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(report.history.len(), 2);

        let ckpt = CheckpointManager::open(&cfg.checkpoint_dir).unwrap();
        assert!(ckpt.model_exists());

        // The saved config records the CSV's real feature width
        assert_eq!(ckpt.load_config().unwrap().input_size, 4);

        let enc = ckpt.load_label_encoder().unwrap();
        assert_eq!(enc.classes(), &["happy", "sad"]);

        assert_eq!(ckpt.load_scaler().unwrap().num_features(), 4);

        let summary = ckpt.load_summary().unwrap();
        assert_eq!(summary.best_epoch, report.best_epoch);
        assert_eq!(summary.train_samples, 24);
        assert_eq!(summary.test_samples, 8);
        assert!(summary.best_accuracy >= report.history[0].test_accuracy);
    }

    #[test]
    fn test_unseen_test_label_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("train.csv"), 8, 0);
        std::fs::write(dir.path().join("test.csv"), "f0,f1,f2,f3,label\n0,0,0,0,fear\n").unwrap();

        let err = TrainUseCase::new(tiny_config(dir.path())).execute().unwrap_err();
        assert!(format!("{err:#}").contains("fear"));
    }

    #[test]
    fn test_feature_width_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("train.csv"), 8, 0);
        std::fs::write(dir.path().join("test.csv"), "f0,label\n0,sad\n").unwrap();

        assert!(TrainUseCase::new(tiny_config(dir.path())).execute().is_err());
    }
}
