// ============================================================
// Layer 4 — Cloud Sample Loader
// ============================================================
// Index → (pixels, class index) over a directory of JPEG files.
//
// The index → identifier mapping is fixed at construction: the
// i-th key of the label store is sample i, and its image lives
// at `<data_dir>/<identifier>.jpg`. Images are decoded lazily,
// one `get` at a time, so a dataset of thousands of photos never
// sits in memory all at once.

use std::path::PathBuf;

use crate::data::transform::ImageTransform;
use crate::domain::{classes::ClassIndex, error::CloudError, label_store::LabelStore};

/// File extension of the dataset images.
pub const IMAGE_EXTENSION: &str = "jpg";

/// One decoded sample, ready for the batcher.
#[derive(Debug, Clone)]
pub struct CloudItem {
    /// [C, H, W] floats in [0, 1]
    pub pixels: Vec<f32>,
    pub label:  usize,
}

pub struct CloudDataset {
    data_dir:  PathBuf,
    samples:   Vec<(String, String)>,
    classes:   ClassIndex,
    transform: ImageTransform,
}

impl CloudDataset {
    pub fn new(store: &LabelStore, data_dir: impl Into<PathBuf>, transform: ImageTransform) -> Self {
        let samples = store
            .entries()
            .map(|(id, label)| (id.to_owned(), label.to_owned()))
            .collect();
        Self {
            data_dir: data_dir.into(),
            samples,
            classes: store.class_index(),
            transform,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn classes(&self) -> &ClassIndex {
        &self.classes
    }

    pub fn transform(&self) -> ImageTransform {
        self.transform
    }

    /// Path of the image backing identifier `id`.
    fn image_file(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{id}.{IMAGE_EXTENSION}"))
    }

    /// Decode sample `index`.
    ///
    /// Fails if the index is out of range, the image file is missing
    /// or undecodable, or the label is not part of the class index.
    pub fn get(&self, index: usize) -> Result<CloudItem, CloudError> {
        let (id, label) = self.samples.get(index).ok_or(CloudError::SampleOutOfRange {
            index,
            len: self.samples.len(),
        })?;

        if label.is_empty() {
            return Err(CloudError::UnlabeledSample { id: id.clone() });
        }
        let label = self
            .classes
            .index_of(label)
            .ok_or_else(|| CloudError::UnknownClass { label: label.clone() })?;

        let path   = self.image_file(id);
        tracing::debug!("Decoding sample {index} from '{}'", path.display());
        let pixels = self.transform.load(&path)?;

        Ok(CloudItem { pixels, label })
    }
}
