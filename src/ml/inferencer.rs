// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Rebuilds the network from a checkpoint and ranks the classes
// for one image. B must be a non-autodiff backend, so BatchNorm
// runs on its running statistics.

use std::path::Path;

use anyhow::{anyhow, Result};
use burn::{prelude::*, tensor::activation::softmax};

use crate::data::transform::{ImageTransform, CHANNELS};
use crate::domain::{
    classes::ClassIndex,
    error::CloudError,
    prediction::{rank, Prediction},
    traits::ImageClassifier,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{ClassifierConfig, CloudClassifier};

pub struct Inferencer<B: Backend> {
    model:     CloudClassifier<B>,
    classes:   ClassIndex,
    transform: ImageTransform,
    device:    B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn new(
        model:     CloudClassifier<B>,
        classes:   ClassIndex,
        transform: ImageTransform,
        device:    B::Device,
    ) -> Self {
        Self { model, classes, transform, device }
    }

    /// Build the network the checkpoint was trained as and load its weights.
    ///
    /// `classes` comes from the label store. When training left a config
    /// next to the checkpoint, its class list must match exactly.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        classes:      ClassIndex,
        device:       B::Device,
    ) -> Result<Self> {
        if classes.is_empty() {
            anyhow::bail!("the label store defines no classes");
        }
        if !ckpt_manager.exists() {
            return Err(CloudError::CheckpointNotFound {
                path: ckpt_manager.path().to_path_buf(),
            }
            .into());
        }

        let (model_cfg, transform) = match ckpt_manager.load_meta()? {
            Some(meta) => {
                if meta.classes != classes {
                    return Err(CloudError::ClassMismatch {
                        trained: meta.classes.joined(),
                        found:   classes.joined(),
                    }
                    .into());
                }
                (meta.model, ImageTransform::new(meta.image_size))
            }
            None => {
                tracing::warn!(
                    "No config next to '{}', assuming default width and image size",
                    ckpt_manager.path().display()
                );
                (ClassifierConfig::new(classes.len()), ImageTransform::default())
            }
        };

        let model: CloudClassifier<B> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from '{}'", ckpt_manager.path().display());

        Ok(Self::new(model, classes, transform, device))
    }

    /// Softmax probabilities for one transformed image, in class order.
    pub fn probabilities(&self, pixels: &[f32]) -> Result<Vec<f32>> {
        let size = self.transform.size();
        let input = Tensor::<B, 1>::from_floats(pixels, &self.device)
            .reshape([1, CHANNELS, size, size]);

        let logits = self.model.forward(input);
        softmax(logits, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read probabilities: {e:?}"))
    }
}

impl<B: Backend> ImageClassifier for Inferencer<B> {
    fn classify(&self, image: &Path) -> Result<Vec<Prediction>> {
        let pixels = self.transform.load(image)?;
        let probs  = self.probabilities(&pixels)?;
        let ranked = rank(&self.classes, &probs)?;
        tracing::debug!(
            "Top class for '{}': {:?}",
            image.display(),
            ranked.first().map(|p| &p.class_name)
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::checkpoint::CheckpointMeta;
    use burn::backend::NdArray;
    use image::{Rgb, RgbImage};

    type TestBackend = NdArray;

    fn classes() -> ClassIndex {
        ClassIndex::from_labels(["Cirrus", "Cumulus", "Stratus"])
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let device = Default::default();
        let model: CloudClassifier<TestBackend> = ClassifierConfig::new(3).init(&device);
        let inf   = Inferencer::new(model, classes(), ImageTransform::new(16), device);
        let probs = inf.probabilities(&vec![0.5; 3 * 16 * 16]).unwrap();
        assert_eq!(probs.len(), 3);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_classify_ranks_every_class() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("sky.png");
        RgbImage::from_pixel(20, 20, Rgb([40, 80, 160])).save(&path).unwrap();

        let device = Default::default();
        let model: CloudClassifier<TestBackend> = ClassifierConfig::new(3).init(&device);
        let inf    = Inferencer::new(model, classes(), ImageTransform::new(16), device);
        let ranked = inf.classify(&path).unwrap();

        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|w| w[0].probability >= w[1].probability));
    }

    #[test]
    fn test_missing_checkpoint() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("absent"));
        let err  = Inferencer::<TestBackend>::from_checkpoint(&ckpt, classes(), Default::default())
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<CloudError>(),
            Some(CloudError::CheckpointNotFound { .. })
        ));
    }

    #[test]
    fn test_class_mismatch_is_rejected() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path().join("best"));
        let device = Default::default();
        let model: CloudClassifier<TestBackend> = ClassifierConfig::new(2).init(&device);
        ckpt.save_model(&model).unwrap();
        ckpt.save_meta(&CheckpointMeta {
            model:      ClassifierConfig::new(2),
            image_size: 16,
            classes:    ClassIndex::from_labels(["Cirrus", "Stratus"]),
        })
        .unwrap();

        let err = Inferencer::<TestBackend>::from_checkpoint(&ckpt, classes(), device)
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<CloudError>(),
            Some(CloudError::ClassMismatch { .. })
        ));
    }

    #[test]
    fn test_rebuilds_from_saved_meta() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path().join("best"));
        let device = Default::default();
        let model: CloudClassifier<TestBackend> = ClassifierConfig::new(3).init(&device);
        ckpt.save_model(&model).unwrap();
        ckpt.save_meta(&CheckpointMeta {
            model:      ClassifierConfig::new(3),
            image_size: 16,
            classes:    classes(),
        })
        .unwrap();

        let inf = Inferencer::<TestBackend>::from_checkpoint(&ckpt, classes(), device).unwrap();
        assert_eq!(inf.probabilities(&vec![0.1; 3 * 16 * 16]).unwrap().len(), 3);
    }

    #[test]
    fn test_zero_image_size_in_config_is_an_error() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path().join("best"));
        let device = Default::default();
        let model: CloudClassifier<TestBackend> = ClassifierConfig::new(3).init(&device);
        ckpt.save_model(&model).unwrap();
        ckpt.save_meta(&CheckpointMeta {
            model:      ClassifierConfig::new(3),
            image_size: 0,
            classes:    classes(),
        })
        .unwrap();

        let err = Inferencer::<TestBackend>::from_checkpoint(&ckpt, classes(), device)
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<CloudError>(),
            Some(CloudError::MalformedCheckpointConfig { .. })
        ));
    }
}
