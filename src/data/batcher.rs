// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to stack decoded samples into
// one image tensor and one target tensor.
//
// How batching works here:
//   Input:  Vec of N CloudItems, each with C*H*W floats
//   Output: CloudBatch with images [N, C, H, W] and targets [N]
//
//   All pixel buffers are concatenated in item order and the
//   flat tensor is reshaped:
//   [s1_c1_p1, ..., s1_c3_pHW, s2_c1_p1, ..., sN_c3_pHW] → [N, C, H, W]
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::{dataset::CloudItem, transform::CHANNELS};

// ─── CloudBatch ───────────────────────────────────────────────────────────────
/// A batch of images ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct CloudBatch<B: Backend> {
    /// shape: [batch_size, 3, size, size]
    pub images: Tensor<B, 4>,

    /// Class indices, shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── CloudBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors land on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct CloudBatcher<B: Backend> {
    pub device:     B::Device,
    pub image_size: usize,
}

impl<B: Backend> CloudBatcher<B> {
    pub fn new(device: B::Device, image_size: usize) -> Self {
        Self { device, image_size }
    }
}

impl<B: Backend> Batcher<CloudItem, CloudBatch<B>> for CloudBatcher<B> {
    fn batch(&self, items: Vec<CloudItem>) -> CloudBatch<B> {
        let batch_size = items.len();
        let size       = self.image_size;

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|item| item.pixels.iter().copied())
            .collect();

        // Burn uses i32 for Int tensors built from slices
        let targets: Vec<i32> = items.iter().map(|item| item.label as i32).collect();

        let images = Tensor::<B, 1>::from_floats(pixels.as_slice(), &self.device)
            .reshape([batch_size, CHANNELS, size, size]);

        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        CloudBatch { images, targets }
    }
}
