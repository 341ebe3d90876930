// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by more than one workflow:
//
//   checkpoint.rs — Saving and loading model weights with Burn's
//                   CompactRecorder, plus the JSON description
//                   inference needs to rebuild the same network.
//
//   metrics.rs    — Per-epoch loss/accuracy rows appended to a
//                   CSV file next to the checkpoint.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
