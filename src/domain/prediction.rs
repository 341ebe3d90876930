// ============================================================
// Layer 3 — Prediction
// ============================================================
// One row of the ranked output of `predict`:
//
//   Cumulonimbus         — 71.32%
//   Cumulus              — 20.05%
//   ...

use std::fmt;

use crate::domain::{classes::ClassIndex, error::CloudError};

/// A class name with its softmax probability in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_name:  String,
    pub probability: f32,
}

impl Prediction {
    pub fn percentage(&self) -> f32 {
        self.probability * 100.0
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<20} — {:.2}%", self.class_name, self.percentage())
    }
}

/// Pair every class with its probability and sort, highest first.
/// The sort is stable, so equal probabilities keep class order.
pub fn rank(classes: &ClassIndex, probabilities: &[f32]) -> Result<Vec<Prediction>, CloudError> {
    if probabilities.len() != classes.len() {
        return Err(CloudError::ScoreCountMismatch {
            expected: classes.len(),
            actual:   probabilities.len(),
        });
    }

    let mut ranked: Vec<Prediction> = classes
        .names()
        .iter()
        .zip(probabilities)
        .map(|(name, &probability)| Prediction {
            class_name: name.clone(),
            probability,
        })
        .collect();

    ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_descending() {
        let classes = ClassIndex::from_labels(["Cirrus", "Cumulus", "Stratus"]);
        let ranked  = rank(&classes, &[0.2, 0.5, 0.3]).unwrap();
        let names: Vec<&str> = ranked.iter().map(|p| p.class_name.as_str()).collect();
        assert_eq!(names, ["Cumulus", "Stratus", "Cirrus"]);
    }

    #[test]
    fn test_ties_keep_class_order() {
        let classes = ClassIndex::from_labels(["a", "b", "c"]);
        let ranked  = rank(&classes, &[0.25, 0.5, 0.25]).unwrap();
        let names: Vec<&str> = ranked.iter().map(|p| p.class_name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_count_mismatch() {
        let classes = ClassIndex::from_labels(["a", "b"]);
        assert!(matches!(
            rank(&classes, &[1.0]),
            Err(CloudError::ScoreCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_display_row() {
        let p = Prediction { class_name: "Cirrus".into(), probability: 0.123456 };
        assert_eq!(p.to_string(), format!("Cirrus{} — 12.35%", " ".repeat(14)));
    }
}
