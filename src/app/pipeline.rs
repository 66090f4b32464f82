//! Shared analysis pipeline used by the CLI, the TUI and the session.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! cleaned lines -> parse -> normalize(x, y) -> {slope, area, peak} -> yield seed
//!
//! Each stage returns a new value; nothing here mutates shared state.
//! Independent files are analysed in parallel (`load_sessions`); each owns
//! its own `Session`.

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::data::Dataset;
use crate::data::columns::{argmax, normalize, parse_dataset};
use crate::domain::{AnalysisConfig, Column, CurvePoint, PeakPoint, SlopeResult};
use crate::error::AppError;
use crate::fit::analyze_slope;
use crate::io::ingest::load_raw_input;
use crate::math::area_under_curve;
use crate::session::Session;

/// Everything derived from one file for one x/y column pair.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub x: Column,
    pub y: Column,
    #[serde(skip)]
    pub dataset: Dataset,
    pub slope: Option<SlopeResult>,
    pub area: f64,
    pub peak: Option<PeakPoint>,
    /// Default yield point: the minimum-x sample of the normalized curve.
    pub yield_seed: Option<CurvePoint>,
}

impl Analysis {
    pub fn curve(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.dataset.points(self.x, self.y)
    }
}

/// Run the full numeric pipeline on cleaned lines.
pub fn analyze(lines: &[String], x: Column, y: Column) -> Analysis {
    let dataset = normalize(parse_dataset(lines), x, y);

    let slope = analyze_slope(&dataset, x, y);
    let area = area_under_curve(dataset.points(x, y));
    let peak = peak_point(&dataset, x, y);
    let yield_seed = min_x_point(&dataset, x, y);

    info!(
        x = %x,
        y = %y,
        samples = dataset.len(),
        max_slope = slope.as_ref().map(|s| s.max_slope),
        area,
        "analysis complete"
    );

    Analysis {
        x,
        y,
        dataset,
        slope,
        area,
        peak,
        yield_seed,
    }
}

/// Read and analyse every input of `config`, in input order.
///
/// The first unreadable file aborts the batch.
pub fn load_sessions(config: &AnalysisConfig) -> Result<Vec<Session>, AppError> {
    config
        .inputs
        .par_iter()
        .map(|path| {
            let raw = load_raw_input(path)?;
            Ok(Session::load_with_columns(raw, config.x_column, config.y_column))
        })
        .collect()
}

/// Maximum force and its displacement (first occurrence).
pub fn peak_point(dataset: &Dataset, x: Column, y: Column) -> Option<PeakPoint> {
    let ys = dataset.column(y);
    let index = argmax(ys)?;
    Some(PeakPoint {
        index,
        max_x: dataset.column(x)[index],
        max_value: ys[index],
    })
}

/// Sample with the smallest x (first occurrence).
pub fn min_x_point(dataset: &Dataset, x: Column, y: Column) -> Option<CurvePoint> {
    let mut best: Option<(f64, f64)> = None;
    for (px, py) in dataset.points(x, y) {
        match best {
            Some((bx, _)) if px >= bx => {}
            _ => best = Some((px, py)),
        }
    }
    best.map(|(px, py)| CurvePoint::new(px, py))
}
