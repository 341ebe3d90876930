// ============================================================
// Layer 5 — Cloud Classifier Network
// ============================================================
// A plain convolutional classifier (~9.9M parameters):
//
//   stem        3 → 64            conv3×3 s1 + BN + ReLU
//   stage 1    64 → 128           conv3×3 s2, conv3×3 s1
//   stage 2   128 → 256           conv3×3 s2, conv3×3 s1
//   stage 3   256 → 512           conv3×3 s2, conv3×3 s1
//   stage 4   512 → 512           conv3×3 s2, conv3×3 s1
//   projection 512 → 1024         conv1×1 + BN + ReLU
//   pool       [N,1024,H,W] → [N,1024]   adaptive average
//   head       1024 → num_classes linear (logits)
//
// Every conv has no bias (BN supplies the shift). Initialisation:
// Kaiming-normal fan-out for conv kernels, BN gamma=1 beta=0,
// head weight N(0, 0.01) with a zero bias.
//
// Eval mode is the inner (non-autodiff) backend: BatchNorm uses
// its running statistics there and batch statistics under
// Autodiff, so `model.valid()` is all it takes to switch.
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    module::Param,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::CrossEntropyLossConfig,
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig},
        BatchNorm, BatchNormConfig, Initializer, Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
};

/// Stem width followed by the output width of each stage.
pub const BASE_CHANNELS: [usize; 5] = [64, 128, 256, 512, 512];

/// Width of the 1×1 projection, independent of the width multiplier.
pub const BOTTLENECK_CHANNELS: usize = 1024;

/// Narrowest a layer may become under the width multiplier.
pub const MIN_CHANNELS: usize = 8;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct ClassifierConfig {
    pub num_classes: usize,
    /// Multiplies every base channel count (1 keeps ~9.9M params).
    #[config(default = 1)]
    pub width_mult:  usize,
}

impl ClassifierConfig {
    /// Channel widths after applying the width multiplier.
    pub fn channels(&self) -> [usize; 5] {
        BASE_CHANNELS.map(|c| (c * self.width_mult).max(MIN_CHANNELS))
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> CloudClassifier<B> {
        let channels = self.channels();

        let stem = ConvBlock::new(3, channels[0], 3, 1, device);

        let mut stages = Vec::with_capacity(2 * (channels.len() - 1));
        for pair in channels.windows(2) {
            let (in_ch, out_ch) = (pair[0], pair[1]);
            stages.push(ConvBlock::new(in_ch, out_ch, 3, 2, device));
            stages.push(ConvBlock::new(out_ch, out_ch, 3, 1, device));
        }

        let projection = Conv2dConfig::new([channels[4], BOTTLENECK_CHANNELS], [1, 1])
            .with_bias(false)
            .with_initializer(conv_initializer())
            .init(device);
        let projection_norm = BatchNormConfig::new(BOTTLENECK_CHANNELS).init(device);

        let mut head = LinearConfig::new(BOTTLENECK_CHANNELS, self.num_classes)
            .with_initializer(Initializer::Normal { mean: 0.0, std: 0.01 })
            .init(device);
        head.bias = Some(Initializer::Zeros.init([self.num_classes], device));

        CloudClassifier {
            stem,
            stages,
            projection,
            projection_norm,
            activation: Relu::new(),
            pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            head,
        }
    }
}

/// Kaiming normal, fan-out mode, ReLU gain (√2).
fn conv_initializer() -> Initializer {
    Initializer::KaimingNormal {
        gain:         std::f64::consts::SQRT_2,
        fan_out_only: true,
    }
}

// ─── ConvBlock ────────────────────────────────────────────────────────────────
/// Conv → BatchNorm → ReLU. A stride of 2 halves the spatial size.
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    conv:       Conv2d<B>,
    norm:       BatchNorm<B, 2>,
    activation: Relu,
}

impl<B: Backend> ConvBlock<B> {
    pub fn new(
        in_ch:  usize,
        out_ch: usize,
        kernel: usize,
        stride: usize,
        device: &B::Device,
    ) -> Self {
        let padding = kernel / 2;
        let conv = Conv2dConfig::new([in_ch, out_ch], [kernel, kernel])
            .with_stride([stride, stride])
            .with_padding(PaddingConfig2d::Explicit(padding, padding))
            .with_bias(false)
            .with_initializer(conv_initializer())
            .init(device);
        let norm = BatchNormConfig::new(out_ch).init(device);
        Self { conv, norm, activation: Relu::new() }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.activation.forward(self.norm.forward(self.conv.forward(x)))
    }

    /// Kernel, optional bias and BN gamma/beta.
    pub fn num_trainable_params(&self) -> usize {
        conv_params(&self.conv) + norm_params(&self.norm)
    }
}

// ─── CloudClassifier ──────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct CloudClassifier<B: Backend> {
    stem:            ConvBlock<B>,
    stages:          Vec<ConvBlock<B>>,
    projection:      Conv2d<B>,
    projection_norm: BatchNorm<B, 2>,
    activation:      Relu,
    pool:            AdaptiveAvgPool2d,
    head:            Linear<B>,
}

impl<B: Backend> CloudClassifier<B> {
    /// images: [batch, 3, H, W] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = self.stem.forward(images);
        for block in &self.stages {
            x = block.forward(x);
        }

        let x = self.activation.forward(self.projection_norm.forward(self.projection.forward(x)));

        let x = self.pool.forward(x); // [batch, 1024, 1, 1]
        let [batch_size, channels, _, _] = x.dims();
        let x = x.reshape([batch_size, channels]);

        self.head.forward(x)
    }

    /// Mean cross-entropy of the logits against class indices.
    /// Returns (loss [1], logits [batch, num_classes]).
    pub fn forward_loss(
        &self,
        images:  Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }

    /// Number of output classes.
    pub fn num_classes(&self) -> usize {
        let [_, num_classes] = self.head.weight.val().dims();
        num_classes
    }

    /// Learnable parameters only. `Module::num_params` also counts the
    /// BatchNorm running mean and variance, which the optimizer never touches.
    pub fn num_trainable_params(&self) -> usize {
        let blocks: usize = std::iter::once(&self.stem)
            .chain(&self.stages)
            .map(ConvBlock::num_trainable_params)
            .sum();
        let head = numel(&self.head.weight) + self.head.bias.as_ref().map_or(0, numel);

        blocks + conv_params(&self.projection) + norm_params(&self.projection_norm) + head
    }
}

fn numel<B: Backend, const D: usize>(param: &Param<Tensor<B, D>>) -> usize {
    param.val().shape().num_elements()
}

fn conv_params<B: Backend>(conv: &Conv2d<B>) -> usize {
    numel(&conv.weight) + conv.bias.as_ref().map_or(0, numel)
}

fn norm_params<B: Backend>(norm: &BatchNorm<B, 2>) -> usize {
    numel(&norm.gamma) + numel(&norm.beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::{Autodiff, NdArray},
        module::AutodiffModule,
        tensor::Distribution,
    };

    type TestBackend = NdArray;

    fn small_input(batch: usize, size: usize) -> Tensor<TestBackend, 4> {
        Tensor::random([batch, 3, size, size], Distribution::Uniform(0.0, 1.0), &Default::default())
    }

    #[test]
    fn test_channels_with_width_mult() {
        assert_eq!(ClassifierConfig::new(10).channels(), BASE_CHANNELS);
        assert_eq!(
            ClassifierConfig::new(10).with_width_mult(2).channels(),
            [128, 256, 512, 1024, 1024]
        );
        assert_eq!(
            ClassifierConfig::new(10).with_width_mult(0).channels(),
            [MIN_CHANNELS; 5]
        );
    }

    #[test]
    fn test_parameter_count() {
        let model: CloudClassifier<TestBackend> =
            ClassifierConfig::new(10).init(&Default::default());
        // conv kernels 9_889_472 + BN affine 7_808 + head 10_250
        assert_eq!(model.num_trainable_params(), 9_907_530);
        assert_eq!(model.num_classes(), 10);
    }

    #[test]
    fn test_head_bias_starts_at_zero() {
        let model: CloudClassifier<TestBackend> =
            ClassifierConfig::new(4).init(&Default::default());
        let bias = model.head.bias.as_ref().unwrap().val();
        let sum: f32 = bias.abs().sum().into_scalar().elem();
        assert_eq!(sum, 0.0);
    }

    #[test]
    fn test_forward_shape_any_batch() {
        let model: CloudClassifier<TestBackend> =
            ClassifierConfig::new(10).init(&Default::default());
        for batch in 1..=3 {
            let logits = model.forward(small_input(batch, 32));
            assert_eq!(logits.dims(), [batch, 10]);
        }
    }

    #[test]
    #[ignore = "full 224×224 forward pass is slow on the CPU backend"]
    fn test_forward_shape_full_resolution() {
        let model: CloudClassifier<TestBackend> =
            ClassifierConfig::new(10).init(&Default::default());
        let logits = model.forward(small_input(2, 224));
        assert_eq!(logits.dims(), [2, 10]);
    }

    #[test]
    fn test_eval_mode_is_deterministic() {
        let device = Default::default();
        let model: CloudClassifier<Autodiff<TestBackend>> = ClassifierConfig::new(3).init(&device);
        let model = model.valid();

        let input = small_input(2, 32);
        let a = model.forward(input.clone());
        let b = model.forward(input);
        a.into_data().assert_eq(&b.into_data(), true);
    }

    #[test]
    fn test_loss_is_finite_scalar() {
        let model: CloudClassifier<TestBackend> =
            ClassifierConfig::new(3).init(&Default::default());
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([0, 2], &Default::default());
        let (loss, logits) = model.forward_loss(small_input(2, 32), targets);
        assert_eq!(logits.dims(), [2, 3]);
        let loss: f32 = loss.into_scalar().elem();
        assert!(loss.is_finite() && loss > 0.0);
    }
}
