// ============================================================
// Layer 3 — Cloud Classes and the Class Index
// ============================================================
// The class index maps label strings to the integer positions
// the network's output layer uses. Training and inference MUST
// agree on it, so there is exactly one way to build it:
// `ClassIndex::from_labels`, which sorts the distinct labels
// lexicographically (byte order, same as code-point order).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The ten meteorological classes of the cloud dataset,
/// in the order the statistics report lists them.
pub const KNOWN_CLASSES: [&str; 10] = [
    "Cirrus",
    "Cirrocumulus",
    "Cirrostratus",
    "Altocumulus",
    "Altostratus",
    "Nimbostratus",
    "Stratocumulus",
    "Stratus",
    "Cumulus",
    "Cumulonimbus",
];

/// Sorted list of distinct class names. Position = class index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassIndex {
    names: Vec<String>,
}

impl ClassIndex {
    /// Derive the index from every label in a store (duplicates allowed).
    /// An empty label marks an unlabelled sample and is not a class.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = labels.into_iter().filter(|l| !l.is_empty()).collect();
        Self {
            names: distinct.into_iter().map(str::to_owned).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Integer position of a label, if it is part of the index.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        // names is sorted, so a binary search is enough
        self.names
            .binary_search_by(|name| name.as_str().cmp(label))
            .ok()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Comma-separated names, used in error messages.
    pub fn joined(&self) -> String {
        self.names.join(", ")
    }
}
