// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Classifies one image with a trained checkpoint:
//
//   Step 1: Check the image exists           (before any model work)
//   Step 2: Load labels, derive classes      (Layer 3 - domain)
//   Step 3: Rebuild model from checkpoint    (Layer 5 - ml)
//   Step 4: Rank classes, render the table   (Layer 3 - domain)
//
// The table is returned as a whole, so a failure at any step
// leaves nothing printed.

use std::path::{Path, PathBuf};

use anyhow::Result;
use burn::prelude::Backend;
use serde::{Deserialize, Serialize};

use crate::domain::{error::CloudError, label_store::LabelStore, traits::ImageClassifier};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictConfig {
    pub labels_path:     PathBuf,
    pub checkpoint_path: PathBuf,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            labels_path:     PathBuf::from("clouds_1/labels.json"),
            checkpoint_path: PathBuf::from("models/ccaim_v0_0_2"),
        }
    }
}

pub struct PredictUseCase {
    config: PredictConfig,
}

impl PredictUseCase {
    pub fn new(config: PredictConfig) -> Self {
        Self { config }
    }

    /// Classify `image` and return the rendered result table.
    pub fn execute<B: Backend>(&self, image: &Path, device: B::Device) -> Result<String> {
        let cfg = &self.config;

        if !image.is_file() {
            return Err(CloudError::ImageNotFound { path: image.to_path_buf() }.into());
        }

        let store   = LabelStore::load(&cfg.labels_path)?;
        let classes = store.class_index();
        tracing::info!("{} classes from '{}'", classes.len(), cfg.labels_path.display());

        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_path);
        let inferencer   = Inferencer::<B>::from_checkpoint(&ckpt_manager, classes, device)?;

        report(&inferencer, image)
    }
}

/// Header framed by blank lines, then one row per class, best first.
pub fn report<C: ImageClassifier>(classifier: &C, image: &Path) -> Result<String> {
    let ranked = classifier.classify(image)?;

    let mut lines = Vec::with_capacity(ranked.len() + 3);
    lines.push(String::new());
    lines.push(format!("prediction result for image: {}", image.display()));
    lines.push(String::new());
    lines.extend(ranked.iter().map(ToString::to_string));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::Prediction;
    use burn::backend::NdArray;

    struct FixedClassifier;

    impl ImageClassifier for FixedClassifier {
        fn classify(&self, _image: &Path) -> Result<Vec<Prediction>> {
            Ok(vec![
                Prediction { class_name: "Cumulus".into(), probability: 0.75 },
                Prediction { class_name: "Cirrus".into(),  probability: 0.25 },
            ])
        }
    }

    struct FailingClassifier;

    impl ImageClassifier for FailingClassifier {
        fn classify(&self, image: &Path) -> Result<Vec<Prediction>> {
            Err(CloudError::ImageDecode { path: image.to_path_buf(), reason: "truncated".into() }.into())
        }
    }

    #[test]
    fn test_report_layout() {
        let text = report(&FixedClassifier, Path::new("sky.jpg")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "prediction result for image: sky.jpg");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], format!("{:<20} — 75.00%", "Cumulus"));
        assert_eq!(lines[4], format!("{:<20} — 25.00%", "Cirrus"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_report_failure_has_no_output() {
        assert!(report(&FailingClassifier, Path::new("sky.jpg")).is_err());
    }

    #[test]
    fn test_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = PredictUseCase::new(PredictConfig {
            labels_path:     dir.path().join("labels.json"),
            checkpoint_path: dir.path().join("best"),
        });
        let err = use_case
            .execute::<NdArray>(&dir.path().join("missing.jpg"), Default::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CloudError>(),
            Some(CloudError::ImageNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_checkpoint() {
        let dir    = tempfile::tempdir().unwrap();
        let labels = crate::data::dataset::tests::write_fixture(dir.path(), &[("a", "Cirrus", 40)]);
        let image  = dir.path().join("a.jpg");

        let use_case = PredictUseCase::new(PredictConfig {
            labels_path:     labels,
            checkpoint_path: dir.path().join("models/none"),
        });
        let err = use_case.execute::<NdArray>(&image, Default::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CloudError>(),
            Some(CloudError::CheckpointNotFound { .. })
        ));
    }
}
