// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop over a fixed train/validation split with Adam.
//
// Key Burn insight:
//   - Training uses an Autodiff backend for gradients; BatchNorm
//     normalises with batch statistics and updates its running ones
//   - model.valid() returns the model on the inner backend, where
//     BatchNorm uses the running statistics (eval mode)
//   - The validation batcher must also use the inner backend
//
// Checkpoint policy: after every epoch, save iff the validation
// loss is strictly below the best seen so far in this run. The
// rebuild config is written together with the weights, so the
// two files on disk always describe the same network.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::batcher::Batcher,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{CloudBatch, CloudBatcher},
    dataset::CloudDataset,
};
use crate::infra::{
    checkpoint::{CheckpointManager, CheckpointMeta},
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::{ClassifierConfig, CloudClassifier};

// ─── BestLoss ─────────────────────────────────────────────────────────────────
/// Tracks the lowest validation loss of the run.
#[derive(Debug, Clone, Copy)]
pub struct BestLoss {
    best: f64,
}

impl Default for BestLoss {
    fn default() -> Self {
        Self { best: f64::INFINITY }
    }
}

impl BestLoss {
    /// Record `loss`; true iff it is strictly lower than every
    /// previous one. NaN never improves.
    pub fn improve(&mut self, loss: f64) -> bool {
        if loss < self.best {
            self.best = loss;
            true
        } else {
            false
        }
    }

    pub fn best(&self) -> Option<f64> {
        self.best.is_finite().then_some(self.best)
    }
}

/// Indices of the samples in each partition.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<usize>,
    pub valid: Vec<usize>,
}

/// What a finished run reports back to the caller.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs:        Vec<EpochMetrics>,
    pub best_val_loss: Option<f64>,
}

impl TrainingSummary {
    /// Epoch numbers that overwrote the checkpoint.
    pub fn saved_epochs(&self) -> Vec<usize> {
        self.epochs.iter().filter(|m| m.saved).map(|m| m.epoch).collect()
    }
}

pub fn run_training<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    dataset:      &CloudDataset,
    split:        Split,
    ckpt_manager: &CheckpointManager,
    rng:          &mut StdRng,
    device:       B::Device,
) -> Result<TrainingSummary> {
    if let Some(seed) = cfg.seed {
        B::seed(seed);
    }

    // ── Build model (resume-by-overwrite) ─────────────────────────────────────
    let model_cfg = ClassifierConfig::new(dataset.classes().len()).with_width_mult(cfg.width_mult);
    let meta = CheckpointMeta {
        model:      model_cfg.clone(),
        image_size: dataset.transform().size(),
        classes:    dataset.classes().clone(),
    };
    ckpt_manager.ensure_resumable(&meta)?;

    let model: CloudClassifier<B> = model_cfg.init(&device);
    let mut model = ckpt_manager.load_if_exists(model, &device)?;
    tracing::info!(
        "Model ready: {} classes, {} parameters",
        model.num_classes(),
        model.num_trainable_params()
    );

    // Optimizer state starts fresh even when weights were resumed
    let mut optim = AdamConfig::new().init();

    let image_size    = dataset.transform().size();
    let train_batcher = CloudBatcher::<B>::new(device.clone(), image_size);
    let valid_batcher = CloudBatcher::<B::InnerBackend>::new(device.clone(), image_size);

    let metrics   = MetricsLogger::new(ckpt_manager.metrics_path())?;
    tracing::info!("Appending epoch metrics to '{}'", metrics.csv_path().display());
    let mut best  = BestLoss::default();
    let mut epochs = Vec::with_capacity(cfg.epochs);
    let mut train_order = split.train;

    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        train_order.shuffle(rng);

        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for indices in train_order.chunks(cfg.batch_size) {
            let batch = load_batch(dataset, &train_batcher, indices)?;
            let (loss, _) = model.forward_loss(batch.images, batch.targets);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = mean(train_loss_sum, train_batches);

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;
        let mut correct      = 0usize;

        for indices in split.valid.chunks(cfg.batch_size) {
            let batch = load_batch(dataset, &valid_batcher, indices)?;
            let targets = batch.targets.clone();
            let (loss, logits) = model_valid.forward_loss(batch.images, batch.targets);

            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;

            // argmax(1) returns [batch, 1]; flatten before comparing
            let predicted = logits.argmax(1).flatten::<1>(0, 1);
            correct += predicted
                .equal(targets)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>() as usize;
        }

        let val_loss     = mean(val_loss_sum, val_batches);
        let val_accuracy = if split.valid.is_empty() {
            0.0
        } else {
            correct as f64 / split.valid.len() as f64
        };

        println!(
            "Epoch [{}/{}] | Train Loss: {:.4} | Val Loss: {:.4}",
            epoch, cfg.epochs, train_loss, val_loss,
        );

        // ── Checkpoint ────────────────────────────────────────────────────────
        let saved = best.improve(val_loss);
        if saved {
            ckpt_manager.save_model(&model)?;
            ckpt_manager.save_meta(&meta)?;
            println!("[INFO] model saved (Val Loss became best: {val_loss:.4})");
        }

        let row = EpochMetrics { epoch, train_loss, val_loss, val_accuracy, saved };
        metrics.log(&row)?;
        epochs.push(row);
    }

    tracing::info!("Training complete!");
    Ok(TrainingSummary { epochs, best_val_loss: best.best() })
}

/// Decode the samples at `indices` and stack them into one batch.
/// Any unreadable sample aborts the run.
fn load_batch<B: Backend>(
    dataset: &CloudDataset,
    batcher: &CloudBatcher<B>,
    indices: &[usize],
) -> Result<CloudBatch<B>> {
    let items = indices
        .iter()
        .map(|&i| dataset.get(i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(batcher.batch(items))
}

fn mean(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { f64::NAN }
}
