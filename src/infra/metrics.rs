// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:        the epoch number (1, 2, 3, ...)
//   - train_loss:   mean cross-entropy over training batches
//   - val_loss:     mean cross-entropy over validation batches
//   - val_accuracy: fraction of validation images classified correctly
//   - saved:        whether this epoch overwrote the checkpoint
//
// Example CSV output:
//   epoch,train_loss,val_loss,val_accuracy,saved
//   1,2.281200,2.190400,0.183000,true
//   2,2.104500,2.215800,0.171000,false
//
// Rows are appended, so several runs against the same
// checkpoint path share one file.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    pub train_loss: f64,

    pub val_loss: f64,

    /// Range: [0.0, 1.0]
    pub val_accuracy: f64,

    pub saved: bool,
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();

        if let Some(dir) = csv_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "epoch,train_loss,val_loss,val_accuracy,saved")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.val_accuracy,
            m.saved,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_then_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().join("runs/metrics.csv")).unwrap();
        logger
            .log(&EpochMetrics { epoch: 1, train_loss: 2.5, val_loss: 2.25, val_accuracy: 0.5, saved: true })
            .unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,val_loss,val_accuracy,saved");
        assert_eq!(lines[1], "1,2.500000,2.250000,0.500000,true");
    }

    #[test]
    fn test_appends_across_loggers() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let row  = EpochMetrics { epoch: 1, train_loss: 1.0, val_loss: 1.0, val_accuracy: 0.0, saved: false };

        MetricsLogger::new(&path).unwrap().log(&row).unwrap();
        MetricsLogger::new(&path).unwrap().log(&row).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        // one header, two rows
        assert_eq!(text.lines().count(), 3);
    }
}
