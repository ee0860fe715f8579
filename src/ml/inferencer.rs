// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{ensure, Context, Result};
use burn::prelude::*;

use crate::data::label_encoder::LabelEncoder;
use crate::data::preprocessor::StandardScaler;
use crate::domain::emotion::{Prediction, UNKNOWN_EMOTION};
use crate::domain::landmarks::{LandmarkVector, LANDMARK_FEATURES};
use crate::domain::traits::EmotionPredictor;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::backend::{default_device, Device, InferBackend};
use crate::ml::model::EmotionClassifier;

/// Evaluation-mode model plus the artifacts needed to turn its
/// output into a label. Built once at startup, never mutated.
pub struct Inferencer {
    model:   EmotionClassifier<InferBackend>,
    encoder: LabelEncoder,
    /// Only set when the caller opted in to standardising inputs
    scaler:  Option<StandardScaler>,
    device:  Device,
}

impl Inferencer {
    /// Rebuild the architecture from `train_config.json`, load the best
    /// weights and the fitted label encoder.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, standardize_input: bool) -> Result<Self> {
        let device = default_device();
        let cfg    = ckpt_manager.load_config()?;
        cfg.validate().context("Invalid train_config.json")?;

        ensure!(
            cfg.input_size == LANDMARK_FEATURES,
            "checkpoint expects {} input features but the service accepts {}",
            cfg.input_size,
            LANDMARK_FEATURES
        );

        // Dropout probabilities are irrelevant here: the inner backend
        // has no autodiff, so Dropout is an identity.
        let model: EmotionClassifier<InferBackend> = cfg.model_config().init(&device);
        let model   = ckpt_manager.load_model(model, &device)?;
        let encoder = ckpt_manager.load_label_encoder()?;

        let scaler = if standardize_input {
            let scaler = ckpt_manager.load_scaler()?;
            ensure!(
                scaler.num_features() == cfg.input_size,
                "scaler was fit on {} features, model expects {}",
                scaler.num_features(),
                cfg.input_size
            );
            Some(scaler)
        } else {
            None
        };

        tracing::info!(
            "Model loaded from checkpoint ({} classes: {:?}, standardize_input={})",
            encoder.num_classes(),
            encoder.classes(),
            standardize_input
        );
        Ok(Self { model, encoder, scaler, device })
    }

    /// Wrap an in-memory model. Used by tests and by callers that
    /// already hold trained weights.
    pub fn from_parts(
        model:   EmotionClassifier<InferBackend>,
        encoder: LabelEncoder,
        scaler:  Option<StandardScaler>,
    ) -> Self {
        Self { model, encoder, scaler, device: default_device() }
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn standardizes_input(&self) -> bool {
        self.scaler.is_some()
    }

    /// Raw logits for one feature row.
    pub fn logits(&self, features: &[f32]) -> Result<Vec<f32>> {
        ensure!(
            features.len() == self.model.input_size,
            "expected {} features, got {}",
            self.model.input_size,
            features.len()
        );

        let mut row = features.to_vec();
        if let Some(scaler) = &self.scaler {
            scaler.transform_row(&mut row);
        }

        let input = Tensor::<InferBackend, 1>::from_floats(row.as_slice(), &self.device)
            .unsqueeze::<2>();
        let logits = self.model.forward(input);

        logits
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read logits: {e:?}"))
    }

    /// Logits → argmax → label. Unmapped indices become "unknown".
    pub fn classify(&self, features: &[f32]) -> Result<Prediction> {
        let logits = self.logits(features)?;
        let class_index = argmax(&logits);
        let emotion = self
            .encoder
            .decode(class_index)
            .unwrap_or(UNKNOWN_EMOTION)
            .to_string();

        tracing::debug!("Received {} values → class {} → {}", features.len(), class_index, emotion);
        Ok(Prediction { class_index, emotion, logits })
    }
}

impl EmotionPredictor for Inferencer {
    fn predict(&self, landmarks: &LandmarkVector) -> Result<Prediction> {
        self.classify(landmarks.as_slice())
    }
}

/// Index of the largest value; ties go to the first occurrence.
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0usize, f32::NEG_INFINITY), |(bi, bv), (i, &v)| {
            if v > bv { (i, v) } else { (bi, bv) }
        })
        .0
}
