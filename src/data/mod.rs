// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the label store on disk and GPU-ready
// tensor batches:
//
//   labels.json + <id>.jpg files
//       │
//       ▼
//   CloudDataset      → index → (pixels, class index), lazily decoded
//       │
//       ▼
//   ImageTransform    → decode, resize to 224×224, scale to [0, 1]
//       │
//       ▼
//   split_train_val   → seeded 80/20 partition of sample indices
//       │
//       ▼
//   CloudBatcher      → stacks samples into [N, 3, H, W] batches
//
// Reference: Burn Book §4 (Datasets and Batchers)

/// Index → decoded sample over the image directory
pub mod dataset;

/// Shared image decode/resize/scale transform
pub mod transform;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
