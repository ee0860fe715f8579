// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:         the epoch number (1, 2, 3, ...)
//   - train_loss:    average cross-entropy over training batches
//   - test_loss:     average cross-entropy over the test split
//   - test_accuracy: fraction of test rows classified correctly
//   - learning_rate: the lr Adam used during this epoch
//
// Output file: <checkpoint_dir>/metrics.csv
//
// Example:
//   epoch,train_loss,test_loss,test_accuracy,learning_rate
//   1,1.812300,1.790100,0.341000,0.001000
//   2,1.533200,1.601900,0.402000,0.001000
//
// A new training run truncates the file so one CSV always
// describes one run.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches.
    /// This is the value the plateau scheduler watches.
    pub train_loss: f64,

    pub test_loss: f64,

    /// Range: [0.0, 1.0]. Drives best-snapshot selection.
    pub test_accuracy: f64,

    pub learning_rate: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:         usize,
        train_loss:    f64,
        test_loss:     f64,
        test_accuracy: f64,
        learning_rate: f64,
    ) -> Self {
        Self { epoch, train_loss, test_loss, test_accuracy, learning_rate }
    }

    /// Strictly better than the best accuracy so far; ties keep the
    /// earlier snapshot.
    pub fn is_improvement(&self, best_accuracy: f64) -> bool {
        self.test_accuracy > best_accuracy
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh metrics file (header only) in `dir`.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)?;
        writeln!(f, "epoch,train_loss,test_loss,test_accuracy,learning_rate")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.test_loss,
            m.test_accuracy,
            m.learning_rate,
        )?;

        Ok(())
    }
}
