// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to the model through this trait,
// so the predict workflow can be exercised without a checkpoint.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use anyhow::Result;

use crate::domain::prediction::Prediction;

// ─── ImageClassifier ──────────────────────────────────────────────────────────
/// Anything that can rank the known classes for one image file.
///
/// Implementations:
///   - Inferencer → the convolutional network loaded from a checkpoint
pub trait ImageClassifier {
    /// Return one prediction per class, highest probability first.
    fn classify(&self, image: &Path) -> Result<Vec<Prediction>>;
}
