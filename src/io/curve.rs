//! Read/write curve JSON files.
//!
//! Curve JSON is the portable snapshot of one analysed file:
//! - file name and the x/y column pair
//! - the normalized curve samples
//! - slope analysis, area, peak and the current interactive points
//!
//! `show` reads it back to print a summary without the original rig file.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Column, CurvePoint, PeakPoint, SlopeResult};
use crate::error::AppError;
use crate::session::Session;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub x: Column,
    pub y: Column,
    pub slope: Option<SlopeResult>,
    pub area: f64,
    pub peak: Option<PeakPoint>,
    pub points: SavedPoints,
    pub curve: Vec<CurvePoint>,
}

/// Interactive points at the time of saving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPoints {
    pub point_one: Option<CurvePoint>,
    pub point_two: Option<CurvePoint>,
    pub yield_point: Option<CurvePoint>,
    pub custom_slope: Option<f64>,
}

impl CurveFile {
    pub fn from_session(session: &Session) -> Self {
        let analysis = session.analysis();
        let state = session.state();
        Self {
            tool: "rig".to_string(),
            created_at: Utc::now(),
            name: session.name().to_string(),
            x: analysis.x,
            y: analysis.y,
            slope: analysis.slope.clone(),
            area: analysis.area,
            peak: analysis.peak,
            points: SavedPoints {
                point_one: state.point_one,
                point_two: state.point_two,
                yield_point: state.yield_point,
                // JSON has no NaN/inf; a degenerate custom slope is saved as null.
                custom_slope: state.custom_slope.filter(|s| s.is_finite()),
            },
            curve: analysis.curve().map(|(x, y)| CurvePoint::new(x, y)).collect(),
        }
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, session: &Session) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create curve JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &CurveFile::from_session(session))
        .map_err(|e| AppError::io(format!("Failed to write curve JSON: {e}")))?;
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::io(format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleConfig, generate_sample};
    use crate::io::ingest::RawInput;

    #[test]
    fn snapshot_carries_columns_and_points() {
        let sample = generate_sample(&SampleConfig::default()).unwrap();
        let session = Session::load(RawInput::new("s1.dat", sample.text));
        let file = CurveFile::from_session(&session);

        assert_eq!(file.name, "s1");
        assert_eq!(file.x, Column::Display1);
        assert_eq!(file.curve.len(), session.analysis().dataset.len());
        assert_eq!(file.points.yield_point, session.state().yield_point);

        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"x\":\"Display 1\""));
        let back: CurveFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.y, Column::Load1);
        assert_eq!(back.peak, file.peak);
    }
}
