//! Raw rig-file ingest.
//!
//! This module turns the text of one instrument export into the list of
//! candidate data lines that the column model parses.
//!
//! Design goals:
//! - **Tolerant**: nothing here fails on malformed content; bad lines simply
//!   produce fewer usable rows downstream
//! - **Line-ending agnostic** (`\n`, `\r\n`, `\r`)
//! - **Separation of concerns**: no numeric parsing here

use std::fs;
use std::path::Path;

use crate::error::AppError;

/// Instrument metadata lines start with this marker and carry no samples.
const METADATA_MARKER: &str = "Axial Counts";

/// Fixed-format header lines preceding the data block.
const HEADER_LINES: usize = 5;

/// Text content of one input file plus the name shown in reports/exports.
#[derive(Debug, Clone)]
pub struct RawInput {
    pub name: String,
    pub text: String,
}

impl RawInput {
    pub fn new(file_name: &str, text: impl Into<String>) -> Self {
        Self {
            name: display_name(file_name),
            text: text.into(),
        }
    }
}

/// Read a rig file from disk.
pub fn load_raw_input(path: &Path) -> Result<RawInput, AppError> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::io(format!("Failed to read '{}': {e}", path.display())))?;
    // Instrument exports are sometimes Latin-1; a lossy decode keeps the
    // numeric rows intact.
    let text = String::from_utf8_lossy(&bytes).into_owned();

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    Ok(RawInput::new(file_name, text))
}

/// File name up to the first `.` (`specimen.run2.csv` -> `specimen`).
pub fn display_name(file_name: &str) -> String {
    file_name.split('.').next().unwrap_or_default().to_string()
}

/// Clean raw text into candidate data lines.
///
/// Drops `Axial Counts` metadata lines, then the fixed header, then blank lines.
pub fn clean_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    normalized
        .split('\n')
        .filter(|line| !line.starts_with(METADATA_MARKER))
        .skip(HEADER_LINES)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
