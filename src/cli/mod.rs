// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to the application
// or API layer. Nothing here computes; it only routes and prints.
//
//   train    → TrainUseCase
//   serve    → ApiServer (blocks until shutdown)
//   predict  → Inferencer + predict use case

pub mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, PredictArgs, ServeArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "facemesh-emotion",
    version,
    about = "Train a transformer emotion classifier on face-mesh landmarks, then serve it."
)]
pub struct Cli {
    /// Deployment root; relative paths in every command resolve against it
    #[arg(long, global = true, env = "FACEMESH_ROOT", default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(&self.root, args),
            Commands::Serve(args)   => run_serve(&self.root, args),
            Commands::Predict(args) => run_predict(&self.root, args),
        }
    }
}

fn run_train(root: &std::path::Path, args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let config = args.into_config(root);
    tracing::info!("Training on '{}', evaluating on '{}'", config.train_csv, config.test_csv);

    let checkpoint_dir = config.checkpoint_dir.clone();
    let report = TrainUseCase::new(config).execute()?;

    println!(
        "Training complete. Best test accuracy {:.2}% at epoch {}; checkpoint saved to '{}'.",
        report.best_accuracy * 100.0,
        report.best_epoch,
        checkpoint_dir
    );
    Ok(())
}

fn run_serve(root: &std::path::Path, args: ServeArgs) -> Result<()> {
    use crate::api::ApiServer;

    let config = args.into_config(root);

    // Load before the runtime starts; a broken checkpoint never opens a socket
    let server = ApiServer::from_config(&config).context("Cannot start prediction service")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;
    runtime.block_on(server.start())
}

fn run_predict(root: &std::path::Path, args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::{predict_emotion, read_landmark_file};
    use crate::infra::checkpoint::CheckpointManager;
    use crate::infra::paths::resolve;
    use crate::ml::inferencer::Inferencer;

    let ckpt_manager = CheckpointManager::open(resolve(root, &args.checkpoint_dir))?;
    let inferencer   = Inferencer::from_checkpoint(&ckpt_manager, args.standardize_input)?;
    let body         = read_landmark_file(resolve(root, &args.landmarks_file))?;

    println!("{}", predict_emotion(&inferencer, &body));
    Ok(())
}
