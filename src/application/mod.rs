// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one command (train, predict, stats or inspect).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1); use cases return text
//   - Only workflow coordination
//
// Each use case owns an explicit config struct; nothing is
// read from process-wide state.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// Classify one image with a trained checkpoint
pub mod predict_use_case;

// Per-class counts of the label store
pub mod stats_use_case;

// Parameter count and output shape of a fresh model
pub mod inspect_use_case;
