//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while analysing a curve
//! - exported to JSON/CSV
//! - reloaded later for summaries

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One of the five data columns written by the test rig.
///
/// Columns appear in this order in every data row, after the leading index
/// field. The human-readable label (`Display 1`, `Load 2`, ...) is only used
/// for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Column {
    #[serde(rename = "Elapsed Time")]
    #[value(name = "elapsed-time")]
    ElapsedTime,
    #[serde(rename = "Scan Time")]
    #[value(name = "scan-time")]
    ScanTime,
    #[serde(rename = "Display 1")]
    #[value(name = "display1")]
    Display1,
    #[serde(rename = "Load 1")]
    #[value(name = "load1")]
    Load1,
    #[serde(rename = "Load 2")]
    #[value(name = "load2")]
    Load2,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::ElapsedTime,
        Column::ScanTime,
        Column::Display1,
        Column::Load1,
        Column::Load2,
    ];

    /// Position of the column within a parsed row.
    pub fn index(self) -> usize {
        match self {
            Column::ElapsedTime => 0,
            Column::ScanTime => 1,
            Column::Display1 => 2,
            Column::Load1 => 3,
            Column::Load2 => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::ElapsedTime => "Elapsed Time",
            Column::ScanTime => "Scan Time",
            Column::Display1 => "Display 1",
            Column::Load1 => "Load 1",
            Column::Load2 => "Load 2",
        }
    }

    pub fn next(self) -> Column {
        Column::ALL[(self.index() + 1) % Column::ALL.len()]
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single `(x, y)` location on (or near) the displacement/force curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Least-squares slope of one fixed sub-range of the elastic window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSlope {
    pub start: f64,
    pub end: f64,
    pub n_points: usize,
    /// `None` when the segment had fewer than two points or degenerate x.
    pub slope: Option<f64>,
}

/// Output of the slope analysis for one x/y column pair.
///
/// This is the baseline the interactive state resets to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlopeResult {
    pub max_slope: f64,
    pub point_one: CurvePoint,
    pub point_two: CurvePoint,
    /// Stiffness line extended past both endpoints, for display only.
    pub extended: [CurvePoint; 2],
    /// Line offset pinned through `point_one`.
    pub offset: f64,
    pub inlier_count: usize,
    pub window_count: usize,
    pub segments: Vec<SegmentSlope>,
}

/// Maximum force of the normalized curve and where it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakPoint {
    pub index: usize,
    pub max_x: f64,
    pub max_value: f64,
}

/// Which of the three user-movable points an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovablePoint {
    PointOne,
    PointTwo,
    Yield,
}

impl MovablePoint {
    pub fn label(self) -> &'static str {
        match self {
            MovablePoint::PointOne => "slope point 1",
            MovablePoint::PointTwo => "slope point 2",
            MovablePoint::Yield => "yield point",
        }
    }
}

/// Resolved settings for one analysis run (CLI or TUI).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub inputs: Vec<PathBuf>,
    pub x_column: Column,
    /// `None` means: use the preferred load column of each file.
    pub y_column: Option<Column>,
    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
    pub debug: bool,
}
