// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + evaluation loop using burn's DataLoader and Adam.
//
// Per epoch:
//   1. Shuffled mini-batches on TrainBackend (Autodiff) →
//      cross-entropy → backward → Adam step at the current lr
//   2. model.valid() → inner backend, dropout off, fixed-order
//      pass over the test split → accuracy
//   3. Plateau scheduler sees the average TRAINING loss
//   4. If test accuracy beats the best so far, keep a snapshot
//
// Only the best snapshot is written to disk, once, after the
// last epoch. The final-epoch weights are discarded unless they
// are also the best.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use std::sync::Arc;

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{decay::WeightDecayConfig, AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{FaceMeshBatch, FaceMeshBatcher},
    dataset::FaceMeshDataset,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::backend::{default_device, InferBackend, TrainBackend};
use crate::ml::model::EmotionClassifier;
use crate::ml::scheduler::ReduceOnPlateau;

/// What a finished training run produced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// One entry per epoch, in order
    pub history:       Vec<EpochMetrics>,
    /// Epoch whose weights were persisted (1-based)
    pub best_epoch:    usize,
    /// Test accuracy of the persisted weights, in [0, 1]
    pub best_accuracy: f64,
}

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: FaceMeshDataset,
    test_dataset:  FaceMeshDataset,
    ckpt_manager:  &CheckpointManager,
) -> Result<TrainingReport> {
    ensure!(cfg.epochs > 0, "epochs must be at least 1");
    ensure!(cfg.batch_size > 0, "batch_size must be at least 1");
    ensure!(train_dataset.sample_count() > 0, "training split is empty");
    ensure!(test_dataset.sample_count() > 0, "test split is empty");

    let device = default_device();
    tracing::info!("Using device: {:?}", device);
    TrainBackend::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = cfg.model_config();
    let mut model: EmotionClassifier<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} blocks, embed_dim={}, {} parameters",
        cfg.num_layers, cfg.embed_dim, model.parameter_count()
    );

    // ── Adam with L2 weight decay ─────────────────────────────────────────────
    let optim_cfg = AdamConfig::new()
        .with_epsilon(1e-8)
        .with_weight_decay(Some(WeightDecayConfig::new(cfg.weight_decay as f32)));
    let mut optim = optim_cfg.init();
    let mut scheduler = ReduceOnPlateau::new(cfg.lr, cfg.lr_factor, cfg.lr_patience);

    // ── Training data loader (AutodiffBackend, reshuffled every epoch) ────────
    let train_batcher = FaceMeshBatcher::<TrainBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Test data loader (InnerBackend, fixed order) ──────────────────────────
    let test_batcher = FaceMeshBatcher::<InferBackend>::new(device.clone());
    let test_loader  = DataLoaderBuilder::new(test_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_dataset);

    let metrics_logger = MetricsLogger::create(ckpt_manager.dir())?;

    let mut history = Vec::with_capacity(cfg.epochs);
    let mut best: Option<(usize, f64, EmotionClassifier<InferBackend>)> = None;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let lr = scheduler.lr();

        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in train_loader.iter() {
            let output = model.forward_classification(batch.features, batch.targets);

            let loss_val: f64 = output.loss.clone().into_scalar().elem::<f64>();
            loss_sum += loss_val;
            batches  += 1;

            let grads = output.loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        let avg_train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };

        let model_valid = model.valid();
        let (test_loss, test_accuracy) = evaluate(&model_valid, &test_loader);

        scheduler.step(avg_train_loss);

        let metrics = EpochMetrics::new(epoch, avg_train_loss, test_loss, test_accuracy, lr);
        metrics_logger.log(&metrics)?;

        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | test_loss={:.4} | accuracy={:.2}% | lr={:.2e}",
            epoch, cfg.epochs, avg_train_loss, test_loss, test_accuracy * 100.0, lr,
        );

        let is_best = match &best {
            None => true,
            Some((_, best_acc, _)) => metrics.is_improvement(*best_acc),
        };
        if is_best {
            tracing::debug!("New best accuracy at epoch {}", epoch);
            best = Some((epoch, test_accuracy, model_valid));
        }

        history.push(metrics);
    }

    // epochs > 0, so at least one snapshot was taken
    let Some((best_epoch, best_accuracy, best_model)) = best else {
        anyhow::bail!("training produced no snapshot");
    };

    ckpt_manager.save_model(&best_model)?;
    tracing::info!(
        "Saved best model from epoch {} (accuracy {:.2}%)",
        best_epoch,
        best_accuracy * 100.0
    );

    Ok(TrainingReport { history, best_epoch, best_accuracy })
}

/// Average cross-entropy and accuracy over a fixed-order loader.
fn evaluate(
    model:  &EmotionClassifier<InferBackend>,
    loader: &Arc<dyn DataLoader<FaceMeshBatch<InferBackend>>>,
) -> (f64, f64) {
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut correct  = 0usize;
    let mut total    = 0usize;

    for batch in loader.iter() {
        let output = model.forward_classification(batch.features, batch.targets);

        loss_sum += output.loss.into_scalar().elem::<f64>();
        batches  += 1;

        // argmax(1) returns shape [batch, 1] — flatten to [batch]
        // before comparing with targets which is [batch]
        let predicted = output.logits.argmax(1).flatten::<1>(0, 1);
        total += output.targets.dims()[0];

        let batch_correct: i64 = predicted
            .equal(output.targets)
            .int().sum().into_scalar().elem::<i64>();
        correct += batch_correct as usize;
    }

    let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
    let accuracy = if total > 0 { correct as f64 / total as f64 } else { 0.0 };
    (avg_loss, accuracy)
}
