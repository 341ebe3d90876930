// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Four commands are supported:
//   1. `train`   — trains the classifier on labelled cloud images
//   2. `predict` — loads a checkpoint and ranks classes for one image
//   3. `stats`   — per-class counts of the label store
//   4. `inspect` — parameter count and output shape of the network
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, PredictArgs, StatsArgs, TrainArgs};

use crate::ml::{default_device, InferBackend, TrainBackend};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "cloud-classifier",
    version,
    about = "Train a convolutional cloud classifier, then classify sky photographs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Stats(args)   => run_stats(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on images in: {}", args.data_dir.display());

    let use_case = TrainUseCase::new(args.into());
    let summary  = use_case.execute::<TrainBackend>(default_device())?;

    match summary.best_val_loss {
        Some(best) => println!(
            "Training complete. Best Val Loss: {best:.4} (checkpoint written after epochs {:?})",
            summary.saved_epochs()
        ),
        None => println!("Training complete. No checkpoint was saved."),
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let image    = args.image.clone();
    let use_case = PredictUseCase::new(args.into());
    let table    = use_case.execute::<InferBackend>(&image, default_device())?;
    println!("{table}");
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<()> {
    use crate::application::stats_use_case::StatsUseCase;

    let text = StatsUseCase::new(args.into()).execute()?;
    println!("{text}");
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let report = InspectUseCase::new(args.into()).execute::<InferBackend>(default_device())?;
    println!("{report}");
    Ok(())
}
