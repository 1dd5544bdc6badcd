use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Averages of one check at one (noise, items per agent) point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub agents: usize,
    pub iterations: usize,
    pub noise_size: f64,
    pub items_per_agent: usize,
    pub means: Vec<f64>,
    pub errors: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub check: String,
    pub columns: Vec<String>,
    pub agent_count: usize,
    pub iterations: usize,
    pub seed: Option<u64>,
    /// Fixed item count, varying noise
    pub noise_sweep: Vec<SweepRow>,
    /// Fixed noise, varying item count
    pub items_sweep: Vec<SweepRow>,
    pub total_duration_ms: f64,
}

impl SweepReport {
    /// Mean of `column` in each row of a sweep
    pub fn column(rows: &[SweepRow], columns: &[String], column: &str) -> Option<Vec<f64>> {
        let idx = columns.iter().position(|c| c == column)?;
        rows.iter().map(|row| row.means.get(idx).copied()).collect()
    }
}

/// Write the report as pretty JSON to `summary.json` in `result_dir`
pub fn write_report_json<P: AsRef<Path>>(
    report: &SweepReport,
    result_dir: P,
) -> std::io::Result<PathBuf> {
    let summary_path = result_dir.as_ref().join("summary.json");
    let mut summary_file = File::create(&summary_path)?;
    serde_json::to_writer_pretty(&mut summary_file, report)?;
    Ok(summary_path)
}
