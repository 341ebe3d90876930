// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Every failure a user can trigger by pointing the tool at the
// wrong file. The application layer wraps these in anyhow with
// extra context; `main` prints them and exits with status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the cloud-classification pipeline.
#[derive(Debug, Error)]
pub enum CloudError {
    /// The JSON label store does not exist.
    #[error("file {} not found!", path.display())]
    LabelStoreNotFound { path: PathBuf },

    /// The label store exists but is not a JSON object of strings.
    #[error("label file {} is malformed: {reason}", path.display())]
    MalformedLabelStore { path: PathBuf, reason: String },

    /// The image passed to `predict` (or referenced by a sample) is missing.
    #[error("image {} not found.", path.display())]
    ImageNotFound { path: PathBuf },

    /// The image exists but cannot be decoded.
    #[error("cannot decode image {}: {reason}", path.display())]
    ImageDecode { path: PathBuf, reason: String },

    /// No parameter snapshot at the configured checkpoint path.
    #[error("model file {} not found.", path.display())]
    CheckpointNotFound { path: PathBuf },

    /// A sample identifier has no ground-truth label.
    #[error("sample '{id}' has no label")]
    UnlabeledSample { id: String },

    /// A label string is not part of the class index.
    #[error("label '{label}' is not a known class")]
    UnknownClass { label: String },

    /// A sample index past the end of the loader.
    #[error("sample index {index} out of range (len {len})")]
    SampleOutOfRange { index: usize, len: usize },

    /// The classes a checkpoint was trained on differ from the label store.
    #[error("checkpoint was trained on classes [{trained}] but the label store has [{found}]")]
    ClassMismatch { trained: String, found: String },

    /// An existing checkpoint was built with a different width multiplier.
    #[error("checkpoint was trained with width multiplier {trained} but {requested} was requested")]
    WidthMismatch { trained: usize, requested: usize },

    /// The JSON next to a checkpoint cannot describe a buildable network.
    #[error("checkpoint config {} is malformed: {reason}", path.display())]
    MalformedCheckpointConfig { path: PathBuf, reason: String },

    /// The number of scores does not match the number of classes.
    #[error("expected {expected} class scores, got {actual}")]
    ScoreCountMismatch { expected: usize, actual: usize },

    /// The train or validation partition came out empty.
    #[error("{partition} partition is empty ({samples} samples in total)")]
    EmptyPartition { partition: &'static str, samples: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CloudError {
    /// Build a malformed-label-store error.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedLabelStore {
            path:   path.into(),
            reason: reason.into(),
        }
    }
}
