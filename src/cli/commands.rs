// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and their flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::{
    inspect_use_case::InspectConfig,
    predict_use_case::PredictConfig,
    stats_use_case::StatsConfig,
    train_use_case::TrainConfig,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the classifier on labelled cloud images
    Train(TrainArgs),

    /// Rank every class for one image using a trained checkpoint
    Predict(PredictArgs),

    /// Print per-class counts of the label file
    Stats(StatsArgs),

    /// Print the parameter count and output shape of the network
    Inspect(InspectArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding one <id>.jpg per labelled sample
    #[arg(long, default_value = "clouds_1")]
    pub data_dir: PathBuf,

    /// JSON object mapping sample id to class name
    #[arg(long, default_value = "clouds_1/labels.json")]
    pub labels: PathBuf,

    /// Checkpoint path; `.mpk` is appended when missing.
    /// An existing checkpoint is loaded before training.
    #[arg(long, default_value = "models/ccaim_v0_0_2")]
    pub checkpoint: PathBuf,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Number of images processed together in one step
    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-5)]
    pub lr: f64,

    /// Multiplier on every convolution width (the 1024 projection stays fixed)
    #[arg(long, default_value_t = 1)]
    pub width_mult: usize,

    /// Seed for the split, the shuffles and weight init; random when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Side length images are resized to
    #[arg(long, default_value_t = 224)]
    pub image_size: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:        a.data_dir,
            labels_path:     a.labels,
            checkpoint_path: a.checkpoint,
            batch_size:      a.batch_size,
            epochs:          a.epochs,
            lr:              a.lr,
            width_mult:      a.width_mult,
            seed:            a.seed,
            image_size:      a.image_size,
            ..TrainConfig::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Image file to classify
    pub image: PathBuf,

    #[arg(long, default_value = "clouds_1/labels.json")]
    pub labels: PathBuf,

    #[arg(long, default_value = "models/ccaim_v0_0_2")]
    pub checkpoint: PathBuf,
}

impl From<PredictArgs> for PredictConfig {
    fn from(a: PredictArgs) -> Self {
        PredictConfig {
            labels_path:     a.labels,
            checkpoint_path: a.checkpoint,
        }
    }
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[arg(long, default_value = "clouds_1/labels.json")]
    pub labels: PathBuf,

    /// Label file entries that are not samples, subtracted from the total
    #[arg(long, default_value_t = 0)]
    pub excluded_entries: usize,
}

impl From<StatsArgs> for StatsConfig {
    fn from(a: StatsArgs) -> Self {
        StatsConfig {
            labels_path:      a.labels,
            excluded_entries: a.excluded_entries,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(long, default_value_t = 10)]
    pub num_classes: usize,

    #[arg(long, default_value_t = 1)]
    pub width_mult: usize,
}

impl From<InspectArgs> for InspectConfig {
    fn from(a: InspectArgs) -> Self {
        InspectConfig {
            num_classes: a.num_classes,
            width_mult:  a.width_mult,
            ..InspectConfig::default()
        }
    }
}
