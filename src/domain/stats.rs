// ============================================================
// Layer 3 — Dataset Statistics
// ============================================================
// Per-class sample counts for the ten known cloud classes.
//
// Report layout:
//
//   statistic dataset (clouds_1/labels.json)
//   images col: 3
//
//   Cirrus          —   2 col. (66.67%)
//   Cirrocumulus    —   0 col. ( 0.00%)
//   ...
//
// `excluded_entries` is subtracted from the entry count before
// percentages are computed. Some exports carry non-sample
// entries in the label file; the default is to exclude none.

use crate::domain::{classes::KNOWN_CLASSES, label_store::LabelStore};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassCount {
    pub class_name: &'static str,
    pub count:      usize,
    pub percent:    f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub source: String,
    pub total:  usize,
    pub rows:   Vec<ClassCount>,
}

impl DatasetStats {
    /// Count every known class in the store.
    pub fn compute(store: &LabelStore, excluded_entries: usize) -> Self {
        let total = store.len().saturating_sub(excluded_entries);

        let rows = KNOWN_CLASSES
            .iter()
            .map(|&class_name| {
                let count   = store.count_of(class_name);
                let percent = if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                ClassCount { class_name, count, percent }
            })
            .collect();

        Self {
            source: store.path().display().to_string(),
            total,
            rows,
        }
    }

    /// Row for one class, if it is a known class.
    pub fn row(&self, class_name: &str) -> Option<&ClassCount> {
        self.rows.iter().find(|r| r.class_name == class_name)
    }

    /// Render the plain-text report (no trailing newline).
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format!("statistic dataset ({})", self.source));
        lines.push(format!("images col: {}\n", self.total));
        for r in &self.rows {
            lines.push(format!(
                "{:<15} — {:>3} col. ({:>5.2}%)",
                r.class_name, r.count, r.percent
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LabelStore {
        LabelStore::from_json(
            "clouds_1/labels.json",
            r#"{"a": "Cirrus", "b": "Cirrus", "c": "Cumulus"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_counts() {
        let stats = DatasetStats::compute(&store(), 0);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.rows.len(), KNOWN_CLASSES.len());
        assert_eq!(stats.row("Cirrus").unwrap().count, 2);
        assert_eq!(stats.row("Cumulus").unwrap().count, 1);
        assert_eq!(stats.row("Stratus").unwrap().count, 0);
    }

    #[test]
    fn test_excluded_entries_shrink_total() {
        let stats = DatasetStats::compute(&store(), 1);
        assert_eq!(stats.total, 2);
        assert!((stats.row("Cirrus").unwrap().percent - 100.0).abs() < 1e-9);
        // excluding more entries than exist saturates at zero
        let empty = DatasetStats::compute(&store(), 10);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.row("Cirrus").unwrap().percent, 0.0);
    }

    #[test]
    fn test_render_layout() {
        let text  = DatasetStats::compute(&store(), 0).render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "statistic dataset (clouds_1/labels.json)");
        assert_eq!(lines[1], "images col: 3");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Cirrus          —   2 col. (66.67%)");
        assert_eq!(lines[4], "Cirrocumulus    —   0 col. ( 0.00%)");
        assert_eq!(lines.len(), 3 + KNOWN_CLASSES.len());
        assert!(!text.ends_with('\n'));
    }
}
