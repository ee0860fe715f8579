// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands:
//   train    fit the classifier on the landmark CSVs
//   serve    expose POST /predict over HTTP
//   predict  classify one landmark file from the shell
//
// Every path flag is relative to `--root` unless absolute.

use std::path::Path;

use clap::{Args, Subcommand};

use crate::api::ServeConfig;
use crate::application::train_use_case::TrainConfig;
use crate::infra::paths::resolve;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the emotion classifier on landmark CSVs
    Train(TrainArgs),

    /// Serve predictions over HTTP
    Serve(ServeArgs),

    /// Classify a single landmark file with a trained checkpoint
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV with 1404 feature columns and a trailing label column
    #[arg(long, default_value = "data/train_faces_mesh.csv")]
    pub train_csv: String,

    /// Held-out CSV in the same layout, used for per-epoch evaluation
    #[arg(long, default_value = "data/test_faces_mesh.csv")]
    pub test_csv: String,

    /// Where weights, label encoder, scaler and metrics are written
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Width of the token embedding; must be divisible by --num-heads
    #[arg(long, default_value_t = 128)]
    pub embed_dim: usize,

    #[arg(long, default_value_t = 4)]
    pub num_heads: usize,

    /// Hidden width of each block's feed-forward network
    #[arg(long, default_value_t = 256)]
    pub ff_dim: usize,

    #[arg(long, default_value_t = 4)]
    pub num_layers: usize,

    #[arg(long, default_value_t = 7)]
    pub num_classes: usize,

    /// Dropout applied right after the input embedding
    #[arg(long, default_value_t = 0.3)]
    pub embedding_dropout: f64,

    /// Dropout inside every transformer block
    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Initial Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    #[arg(long, default_value_t = 1e-5)]
    pub weight_decay: f64,

    /// Multiplier applied to the learning rate when training loss plateaus
    #[arg(long, default_value_t = 0.5)]
    pub lr_factor: f64,

    /// Flat training-loss epochs tolerated; the rate drops on the next one
    #[arg(long, default_value_t = 2)]
    pub lr_patience: usize,

    /// Seeds weight init, dropout and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl TrainArgs {
    /// Convert into the application-layer config, resolving every
    /// path against the deployment root.
    pub fn into_config(self, root: &Path) -> TrainConfig {
        let path = |p: &str| resolve(root, p).to_string_lossy().into_owned();
        TrainConfig {
            train_csv:         path(&self.train_csv),
            test_csv:          path(&self.test_csv),
            checkpoint_dir:    path(&self.checkpoint_dir),
            embed_dim:         self.embed_dim,
            num_heads:         self.num_heads,
            ff_dim:            self.ff_dim,
            num_layers:        self.num_layers,
            num_classes:       self.num_classes,
            embedding_dropout: self.embedding_dropout,
            dropout:           self.dropout,
            batch_size:        self.batch_size,
            epochs:            self.epochs,
            lr:                self.lr,
            weight_decay:      self.weight_decay,
            lr_factor:         self.lr_factor,
            lr_patience:       self.lr_patience,
            seed:              self.seed,
            ..TrainConfig::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "FACEMESH_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "FACEMESH_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory written by `train`
    #[arg(long, env = "FACEMESH_CHECKPOINT_DIR", default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Apply the training-time feature scaler to incoming landmarks
    #[arg(long, env = "FACEMESH_STANDARDIZE_INPUT")]
    pub standardize_input: bool,
}

impl ServeArgs {
    pub fn into_config(self, root: &Path) -> ServeConfig {
        ServeConfig {
            host:              self.host,
            port:              self.port,
            checkpoint_dir:    resolve(root, &self.checkpoint_dir),
            standardize_input: self.standardize_input,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// JSON file holding `{"landmarks": [...]}` or a bare array
    #[arg(long)]
    pub landmarks_file: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Apply the training-time feature scaler before classifying
    #[arg(long)]
    pub standardize_input: bool,
}
