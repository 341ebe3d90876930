// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the label store          (Layer 3 - domain)
//   Step 2: Build the image dataset       (Layer 4 - data)
//   Step 3: Split train/validation        (Layer 4 - data)
//   Step 4: Run training loop             (Layer 5 - ml)
//
// The trainer checks an existing checkpoint against this run
// before resuming, and writes the rebuild config only when it
// writes weights.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use std::path::PathBuf;

use anyhow::{bail, Result};
use burn::tensor::backend::AutodiffBackend;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::CloudDataset,
    splitter::{seeded_rng, split_train_val},
    transform::{ImageTransform, IMAGE_SIZE},
};
use crate::domain::{error::CloudError, label_store::LabelStore};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::trainer::{run_training, Split, TrainingSummary};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so a run can be described in JSON and logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:        PathBuf,
    pub labels_path:     PathBuf,
    pub checkpoint_path: PathBuf,
    pub batch_size:      usize,
    pub epochs:          usize,
    pub lr:              f64,
    pub width_mult:      usize,
    pub seed:            Option<u64>,
    pub image_size:      usize,
    pub train_fraction:  f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:        PathBuf::from("clouds_1"),
            labels_path:     PathBuf::from("clouds_1/labels.json"),
            checkpoint_path: PathBuf::from("models/ccaim_v0_0_2"),
            batch_size:      16,
            epochs:          10,
            lr:              1e-5,
            width_mult:      1,
            seed:            None,
            image_size:      IMAGE_SIZE,
            train_fraction:  0.8,
        }
    }
}

impl TrainConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch size must be at least 1");
        }
        if self.epochs == 0 {
            bail!("epochs must be at least 1");
        }
        if self.width_mult == 0 {
            bail!("width multiplier must be at least 1");
        }
        if self.image_size == 0 {
            bail!("image size must be at least 1");
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            bail!("train fraction must lie strictly between 0 and 1, got {}", self.train_fraction);
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            bail!("learning rate must be positive, got {}", self.lr);
        }
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

    /// Execute the full training pipeline end to end on backend `B`.
    pub fn execute<B: AutodiffBackend>(&self, device: B::Device) -> Result<TrainingSummary> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load the label store ──────────────────────────────────────
        // Missing or malformed labels are fatal
        tracing::info!("Loading labels from '{}'", cfg.labels_path.display());
        let store = LabelStore::load(&cfg.labels_path)?;
        tracing::info!("Loaded {} labelled samples", store.len());

        // ── Step 2: Build the dataset ─────────────────────────────────────────
        // Images are decoded lazily, one batch at a time
        let dataset = CloudDataset::new(&store, &cfg.data_dir, ImageTransform::new(cfg.image_size));
        if dataset.is_empty() {
            return Err(CloudError::EmptyPartition { partition: "training", samples: 0 }.into());
        }
        tracing::info!(
            "Classes ({}): {}",
            dataset.classes().len(),
            dataset.classes().joined()
        );

        // ── Step 3: Train / validation split ──────────────────────────────────
        let mut rng = seeded_rng(cfg.seed);
        let (train, valid) = split_train_val((0..dataset.len()).collect(), cfg.train_fraction, &mut rng);
        for (partition, indices) in [("training", &train), ("validation", &valid)] {
            if indices.is_empty() {
                return Err(CloudError::EmptyPartition { partition, samples: dataset.len() }.into());
            }
        }
        tracing::info!("Split: {} train, {} validation", train.len(), valid.len());

        // ── Step 4: Run training loop (Layer 5) ───────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_path);
        run_training::<B>(cfg, &dataset, Split { train, valid }, &ckpt_manager, &mut rng, device)
    }
}
