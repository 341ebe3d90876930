// ============================================================
// Layer 3 — Labeled Sample Store
// ============================================================
// The ground truth of the dataset: a JSON object mapping each
// sample identifier to its class name, e.g.
//
//   { "0001": "Cirrus", "0002": "Cumulus", ... }
//
// Key order matters: the sample loader assigns index i to the
// i-th key, so entries are kept in file order (serde_json is
// built with `preserve_order`).

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::domain::{classes::ClassIndex, error::CloudError};

/// Immutable identifier → label mapping loaded from disk.
#[derive(Debug, Clone)]
pub struct LabelStore {
    path:    PathBuf,
    entries: Vec<(String, String)>,
}

impl LabelStore {
    /// Read and parse a label store file.
    ///
    /// A missing file is `LabelStoreNotFound`; anything that is not
    /// a JSON object whose values are all strings is `MalformedLabelStore`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CloudError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CloudError::LabelStoreNotFound { path: path.to_path_buf() },
            _ => CloudError::Io(e),
        })?;
        Self::from_json(path, &json)
    }

    /// Parse label-store JSON. `path` is only kept for reporting.
    pub fn from_json(path: impl Into<PathBuf>, json: &str) -> Result<Self, CloudError> {
        let path = path.into();
        let map: Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| CloudError::malformed(&path, e.to_string()))?;

        let mut entries = Vec::with_capacity(map.len());
        for (id, value) in map {
            match value {
                Value::String(label) => entries.push((id, label)),
                other => {
                    return Err(CloudError::malformed(
                        &path,
                        format!("label of '{id}' is not a string: {other}"),
                    ))
                }
            }
        }

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (identifier, label) pairs in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, label)| (id.as_str(), label.as_str()))
    }

    /// How many samples carry exactly this label.
    pub fn count_of(&self, label: &str) -> usize {
        self.entries.iter().filter(|(_, l)| l == label).count()
    }

    /// The class index shared by training and inference.
    pub fn class_index(&self) -> ClassIndex {
        ClassIndex::from_labels(self.entries.iter().map(|(_, label)| label.as_str()))
    }
}
