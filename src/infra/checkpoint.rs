// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// One checkpoint per configured path, overwritten whenever the
// validation loss improves. Next to it lives a small JSON file
// describing how to rebuild the network:
//
//   models/
//     ccaim_v0_0_2.mpk           ← weights (MessagePack)
//     ccaim_v0_0_2.config.json   ← width, image size, class names
//     ccaim_v0_0_2.metrics.csv   ← per-epoch losses (MetricsLogger)
//
// Loading a record into a model of a different architecture fails,
// so the config must be read before the weights.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::domain::{classes::ClassIndex, error::CloudError};
use crate::ml::model::{ClassifierConfig, CloudClassifier, CloudClassifierRecord};

/// Extension CompactRecorder gives its files.
pub const CHECKPOINT_EXTENSION: &str = "mpk";

/// Everything needed to rebuild the network a checkpoint belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMeta {
    pub model:      ClassifierConfig,
    pub image_size: usize,
    pub classes:    ClassIndex,
}

impl CheckpointMeta {
    /// Reason this description cannot be turned into a network, if any.
    fn problem(&self) -> Option<String> {
        if self.image_size == 0 {
            Some("image_size must be at least 1".into())
        } else if self.model.width_mult == 0 {
            Some("width_mult must be at least 1".into())
        } else if self.classes.is_empty() {
            Some("no classes".into())
        } else if self.model.num_classes != self.classes.len() {
            Some(format!(
                "num_classes is {} but {} class names are listed",
                self.model.num_classes,
                self.classes.len()
            ))
        } else {
            None
        }
    }
}

/// Manages saving and loading of the single best-model checkpoint.
pub struct CheckpointManager {
    /// Weights file, always ending in `.mpk`
    path: PathBuf,
}

impl CheckpointManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let path = if path.extension() == Some(OsStr::new(CHECKPOINT_EXTENSION)) {
            path
        } else {
            // append rather than replace, so "model_v0.2" keeps its ".2"
            let mut raw = path.into_os_string();
            raw.push(".");
            raw.push(CHECKPOINT_EXTENSION);
            PathBuf::from(raw)
        };
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path.with_extension("config.json")
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.path.with_extension("metrics.csv")
    }

    /// Overwrite the checkpoint with the model's current weights.
    pub fn save_model<B: Backend>(&self, model: &CloudClassifier<B>) -> Result<()> {
        self.ensure_parent_dir()?;

        CompactRecorder::new()
            .record(model.clone().into_record(), self.path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", self.path.display())
            })?;

        tracing::debug!("Saved checkpoint to '{}'", self.path.display());
        Ok(())
    }

    /// Load weights into `model`. A missing file is `CheckpointNotFound`.
    pub fn load_model<B: Backend>(
        &self,
        model:  CloudClassifier<B>,
        device: &B::Device,
    ) -> Result<CloudClassifier<B>> {
        if !self.exists() {
            return Err(CloudError::CheckpointNotFound { path: self.path.clone() }.into());
        }

        let record: CloudClassifierRecord<B> = CompactRecorder::new()
            .load(self.path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Was it saved by a different architecture?",
                    self.path.display()
                )
            })?;

        let [_, saved_classes] = record.head.weight.val().dims();
        if saved_classes != model.num_classes() {
            return Err(CloudError::ClassMismatch {
                trained: format!("{saved_classes} classes"),
                found:   format!("{} classes", model.num_classes()),
            }
            .into());
        }

        Ok(model.load_record(record))
    }

    /// Resume-by-overwrite: load weights when a checkpoint exists,
    /// otherwise keep the freshly initialised model.
    pub fn load_if_exists<B: Backend>(
        &self,
        model:  CloudClassifier<B>,
        device: &B::Device,
    ) -> Result<CloudClassifier<B>> {
        if self.exists() {
            tracing::info!("Loading model from '{}'", self.path.display());
            self.load_model(model, device)
        } else {
            tracing::info!("No checkpoint at '{}', creating new model", self.path.display());
            Ok(model)
        }
    }

    /// Write the rebuild description next to the weights.
    pub fn save_meta(&self, meta: &CheckpointMeta) -> Result<()> {
        self.ensure_parent_dir()?;
        let path = self.config_path();
        let json = serde_json::to_string_pretty(meta)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved checkpoint config to '{}'", path.display());
        Ok(())
    }

    /// Read the rebuild description, if training wrote one.
    pub fn load_meta(&self) -> Result<Option<CheckpointMeta>> {
        let path = self.config_path();
        if !path.is_file() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let meta: CheckpointMeta = serde_json::from_str(&json)
            .with_context(|| format!("Malformed checkpoint config '{}'", path.display()))?;
        if let Some(reason) = meta.problem() {
            return Err(CloudError::MalformedCheckpointConfig { path, reason }.into());
        }
        Ok(Some(meta))
    }

    /// Refuse to resume when the saved checkpoint describes a different
    /// network than `wanted`. Nothing on disk is touched.
    pub fn ensure_resumable(&self, wanted: &CheckpointMeta) -> Result<()> {
        if !self.exists() {
            return Ok(());
        }
        let Some(saved) = self.load_meta()? else {
            tracing::warn!(
                "No config next to '{}', the weights must fit the new network as-is",
                self.path.display()
            );
            return Ok(());
        };
        if saved.classes != wanted.classes {
            return Err(CloudError::ClassMismatch {
                trained: saved.classes.joined(),
                found:   wanted.classes.joined(),
            }
            .into());
        }
        if saved.model.width_mult != wanted.model.width_mult {
            return Err(CloudError::WidthMismatch {
                trained:   saved.model.width_mult,
                requested: wanted.model.width_mult,
            }
            .into());
        }
        Ok(())
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
        }
        Ok(())
    }
}
