// ============================================================
// Layer 2 — StatsUseCase
// ============================================================
// Counts the label store per known class, writes the report to
// `dataset_stats.txt` next to the label file and hands the same
// text back for printing.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{label_store::LabelStore, stats::DatasetStats};

/// Report file name, created in the label store's directory.
pub const STATS_FILE_NAME: &str = "dataset_stats.txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    pub labels_path:      PathBuf,
    /// Entries of the label file that are not samples.
    pub excluded_entries: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            labels_path:      PathBuf::from("clouds_1/labels.json"),
            excluded_entries: 0,
        }
    }
}

pub struct StatsUseCase {
    config: StatsConfig,
}

impl StatsUseCase {
    pub fn new(config: StatsConfig) -> Self {
        Self { config }
    }

    /// Where the report is written.
    pub fn output_path(&self) -> PathBuf {
        match self.config.labels_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(STATS_FILE_NAME),
            _ => PathBuf::from(STATS_FILE_NAME),
        }
    }

    pub fn execute(&self) -> Result<String> {
        let cfg = &self.config;

        let store = LabelStore::load(&cfg.labels_path)?;
        if store.is_empty() {
            tracing::warn!("Label file '{}' has no entries", cfg.labels_path.display());
        }
        let stats = DatasetStats::compute(&store, cfg.excluded_entries);
        let text  = stats.render();

        let out = self.output_path();
        fs::write(&out, &text).with_context(|| format!("Cannot write '{}'", out.display()))?;
        tracing::info!("Statistics written to '{}'", out.display());

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::CloudError;

    #[test]
    fn test_writes_report_next_to_labels() {
        let dir    = tempfile::tempdir().unwrap();
        let labels = dir.path().join("labels.json");
        fs::write(&labels, r#"{"a": "Cirrus", "b": "Cirrus", "c": "Cumulus"}"#).unwrap();

        let use_case = StatsUseCase::new(StatsConfig { labels_path: labels.clone(), excluded_entries: 0 });
        let text     = use_case.execute().unwrap();

        let written = fs::read_to_string(dir.path().join(STATS_FILE_NAME)).unwrap();
        assert_eq!(written, text);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("statistic dataset ({})", labels.display()));
        assert_eq!(lines[1], "images col: 3");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], format!("{:<15} —   2 col. (66.67%)", "Cirrus"));
        assert_eq!(lines.len(), 13);
    }

    #[test]
    fn test_bare_file_name_writes_to_cwd_path() {
        let use_case = StatsUseCase::new(StatsConfig {
            labels_path:      PathBuf::from("labels.json"),
            excluded_entries: 0,
        });
        assert_eq!(use_case.output_path(), PathBuf::from(STATS_FILE_NAME));
    }

    #[test]
    fn test_missing_labels() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = StatsUseCase::new(StatsConfig {
            labels_path: dir.path().join("absent.json"),
            ..StatsConfig::default()
        });
        let err = use_case.execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CloudError>(),
            Some(CloudError::LabelStoreNotFound { .. })
        ));
        assert!(!dir.path().join(STATS_FILE_NAME).exists());
    }
}
