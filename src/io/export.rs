//! Export accumulated per-file results to CSV.
//!
//! One row per exported file, with the columns a spreadsheet user expects:
//! `file name, slope, area, yield displacement, yield strength, max strength`.
//! Missing values (no slope window, empty curve) are written as empty fields.

use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// File name used when no export path is configured.
pub const DEFAULT_EXPORT_NAME: &str = "mechanical property.csv";

/// Values recorded for one file at the moment it was exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "file name")]
    pub file_name: String,
    /// The current (possibly user-adjusted) stiffness.
    pub slope: Option<f64>,
    pub area: f64,
    #[serde(rename = "yield displacement")]
    pub yield_displacement: Option<f64>,
    #[serde(rename = "yield strength")]
    pub yield_strength: Option<f64>,
    #[serde(rename = "max strength")]
    pub max_strength: Option<f64>,
}

/// Rows collected during one process run, in export order.
#[derive(Debug, Clone, Default)]
pub struct ExportLog {
    rows: Vec<ExportRow>,
}

impl ExportLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ExportRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ExportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_csv_string(&self) -> Result<String, AppError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        self.write_rows(&mut writer)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::internal(format!("Failed to finish export CSV: {e}")))?;
        String::from_utf8(bytes).map_err(|e| AppError::internal(format!("Export CSV is not UTF-8: {e}")))
    }

    /// Write the whole log to `path`, replacing any previous file.
    pub fn write_csv(&self, path: &Path) -> Result<(), AppError> {
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
        self.write_rows(&mut writer)?;
        writer
            .flush()
            .map_err(|e| AppError::io(format!("Failed to write export CSV '{}': {e}", path.display())))
    }

    fn write_rows<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), AppError> {
        if self.rows.is_empty() {
            // serde only emits the header alongside the first record.
            writer
                .write_record(HEADER)
                .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;
        }
        for row in &self.rows {
            writer
                .serialize(row)
                .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
        }
        Ok(())
    }
}

const HEADER: [&str; 6] = [
    "file name",
    "slope",
    "area",
    "yield displacement",
    "yield strength",
    "max strength",
];
