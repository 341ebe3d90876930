// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Builds a freshly initialised network, counts its parameters
// and pushes one blank image through it to show the output shape.

use std::fmt;

use anyhow::Result;
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::transform::{CHANNELS, IMAGE_SIZE};
use crate::domain::classes::KNOWN_CLASSES;
use crate::ml::model::{ClassifierConfig, CloudClassifier};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectConfig {
    pub num_classes: usize,
    pub width_mult:  usize,
    pub image_size:  usize,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            num_classes: KNOWN_CLASSES.len(),
            width_mult:  1,
            image_size:  IMAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    pub num_params:   usize,
    pub input_shape:  [usize; 4],
    pub output_shape: [usize; 2],
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "trainable parameters: {}", self.num_params)?;
        writeln!(f, "input shape:  {:?}", self.input_shape)?;
        write!(f, "output shape: {:?}", self.output_shape)
    }
}

pub struct InspectUseCase {
    config: InspectConfig,
}

impl InspectUseCase {
    pub fn new(config: InspectConfig) -> Self {
        Self { config }
    }

    pub fn execute<B: Backend>(&self, device: B::Device) -> Result<ModelReport> {
        let cfg = &self.config;
        anyhow::ensure!(cfg.num_classes > 0, "number of classes must be at least 1");
        anyhow::ensure!(cfg.width_mult > 0, "width multiplier must be at least 1");
        anyhow::ensure!(cfg.image_size > 0, "image size must be at least 1");

        let model: CloudClassifier<B> = ClassifierConfig::new(cfg.num_classes)
            .with_width_mult(cfg.width_mult)
            .init(&device);

        let input_shape = [1, CHANNELS, cfg.image_size, cfg.image_size];
        let output      = model.forward(Tensor::zeros(input_shape, &device));

        Ok(ModelReport {
            num_params:   model.num_trainable_params(),
            input_shape,
            output_shape: output.dims(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_report_shape() {
        let use_case = InspectUseCase::new(InspectConfig { num_classes: 10, width_mult: 1, image_size: 32 });
        let report   = use_case.execute::<NdArray>(Default::default()).unwrap();
        assert_eq!(report.output_shape, [1, 10]);
        assert_eq!(report.num_params, 9_907_530);
        assert!(report.to_string().starts_with("trainable parameters: 9907530\n"));
    }

    #[test]
    fn test_zero_classes_rejected() {
        let use_case = InspectUseCase::new(InspectConfig { num_classes: 0, ..InspectConfig::default() });
        assert!(use_case.execute::<NdArray>(Default::default()).is_err());
    }
}
