// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model math lives here:
//
//   model.rs      — The convolutional classifier
//                   stem + 4 stages of Conv/BN/ReLU blocks,
//                   1×1 projection, global average pool, linear head
//
//   trainer.rs    — The training loop
//                   forward pass, cross-entropy, backward pass,
//                   Adam step, validation, best-loss checkpointing
//
//   inferencer.rs — The inference engine
//                   loads a checkpoint, transforms one image,
//                   runs the model, ranks softmax probabilities
//
// Backends: the binary runs on wgpu. WgpuDevice::default() picks the
// best available adapter at startup (discrete GPU, then integrated,
// then a CPU adapter). Tests run on NdArray.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

use burn::backend::{wgpu::WgpuDevice, Autodiff, Wgpu};

/// Cloud classifier network architecture
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and ranks classes
pub mod inferencer;

/// Backend for inference and model inspection (eval mode).
pub type InferBackend = Wgpu;

/// Backend for training (gradients on top of wgpu).
pub type TrainBackend = Autodiff<Wgpu>;

/// Auto-detected compute device.
pub fn default_device() -> WgpuDevice {
    let device = WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    device
}
