//! One loaded file and its live analysis.
//!
//! A `Session` is built fresh for every input file and owned by whichever
//! shell drives it. Changing the column pair re-runs the pipeline from the
//! retained cleaned lines and reseeds the interactive points.

pub mod interactive;

pub use interactive::{InteractiveState, SampleIndex};

use crate::app::pipeline::{Analysis, analyze};
use crate::data::columns::preferred_load_column;
use crate::domain::{Column, CurvePoint, MovablePoint};
use crate::io::export::ExportRow;
use crate::io::ingest::{RawInput, clean_lines};

/// Default displacement column.
pub const DEFAULT_X: Column = Column::Display1;

#[derive(Debug, Clone)]
pub struct Session {
    name: String,
    lines: Vec<String>,
    analysis: Analysis,
    state: InteractiveState,
    index: SampleIndex,
}

impl Session {
    /// Ingest a file and analyse it with the default column pair.
    pub fn load(input: RawInput) -> Self {
        let lines = clean_lines(&input.text);
        let preferred_y = preferred_load_column(&lines);
        Self::build(input.name, lines, DEFAULT_X, preferred_y)
    }

    /// Like `load`, with an explicit column pair (`y = None` keeps the preferred load).
    pub fn load_with_columns(input: RawInput, x: Column, y: Option<Column>) -> Self {
        let lines = clean_lines(&input.text);
        let y = y.unwrap_or_else(|| preferred_load_column(&lines));
        Self::build(input.name, lines, x, y)
    }

    fn build(name: String, lines: Vec<String>, x: Column, y: Column) -> Self {
        let analysis = analyze(&lines, x, y);
        let state = InteractiveState::seeded(analysis.slope.as_ref(), analysis.yield_seed);
        let index = SampleIndex::new(analysis.dataset.column(x));
        Self {
            name,
            lines,
            analysis,
            state,
            index,
        }
    }

    /// Re-run the analysis for a new column pair, discarding point edits.
    pub fn set_columns(&mut self, x: Column, y: Column) {
        self.analysis = analyze(&self.lines, x, y);
        self.state = InteractiveState::seeded(self.analysis.slope.as_ref(), self.analysis.yield_seed);
        self.index = SampleIndex::new(self.analysis.dataset.column(x));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn state(&self) -> &InteractiveState {
        &self.state
    }

    pub fn set_point(&mut self, which: MovablePoint, x: f64, y: f64) {
        self.state.set_point(which, x, y);
    }

    pub fn recompute_custom_slope(&mut self) -> Option<f64> {
        self.state.recompute_custom_slope()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Move a point to the sample nearest `x`, updating the custom slope when
    /// a slope point moved. Returns the sample it landed on.
    pub fn snap_point(&mut self, which: MovablePoint, x: f64) -> Option<CurvePoint> {
        let idx = self.index.nearest(x)?;
        self.place_on_sample(which, idx)
    }

    /// Move a point `delta` samples along the curve (in x order).
    pub fn step_point(&mut self, which: MovablePoint, delta: isize) -> Option<CurvePoint> {
        let current = self.state.point(which)?;
        let from = self.index.nearest(current.x)?;
        let idx = self.index.step(from, delta)?;
        self.place_on_sample(which, idx)
    }

    fn place_on_sample(&mut self, which: MovablePoint, idx: usize) -> Option<CurvePoint> {
        let x = *self.analysis.dataset.column(self.analysis.x).get(idx)?;
        let y = *self.analysis.dataset.column(self.analysis.y).get(idx)?;
        self.state.set_point(which, x, y);
        if which != MovablePoint::Yield {
            self.state.recompute_custom_slope();
        }
        Some(CurvePoint::new(x, y))
    }

    /// Result row for the export log, using the current (possibly edited) values.
    pub fn export_row(&self) -> ExportRow {
        ExportRow {
            file_name: self.name.clone(),
            slope: self.state.custom_slope,
            area: self.analysis.area,
            yield_displacement: self.state.yield_point.map(|p| p.x),
            yield_strength: self.state.yield_point.map(|p| p.y),
            max_strength: self.analysis.peak.map(|p| p.max_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleConfig, generate_sample};

    fn session() -> Session {
        let sample = generate_sample(&SampleConfig::default()).unwrap();
        Session::load(RawInput::new("specimen.txt", sample.text))
    }

    #[test]
    fn load_uses_default_columns() {
        let s = session();
        assert_eq!(s.name(), "specimen");
        assert_eq!(s.analysis().x, Column::Display1);
        assert_eq!(s.analysis().y, Column::Load1);
        assert!(s.analysis().slope.is_some());
        assert_eq!(s.state().custom_slope, s.analysis().slope.as_ref().map(|r| r.max_slope));
    }

    #[test]
    fn snapping_moves_onto_samples_and_updates_slope() {
        let mut s = session();
        let landed = s.snap_point(MovablePoint::PointTwo, 0.0401).unwrap();
        assert!((landed.x - 0.04).abs() < 1e-3);
        let p1 = s.state().point_one.unwrap();
        let expected = (landed.y - p1.y) / (landed.x - p1.x);
        assert_eq!(s.state().custom_slope, Some(expected));

        let yield_before = s.state().custom_slope;
        s.step_point(MovablePoint::Yield, 3).unwrap();
        assert_eq!(s.state().custom_slope, yield_before);
    }

    #[test]
    fn set_columns_reseeds_and_discards_edits() {
        let mut s = session();
        let original = s.state().clone();
        s.set_point(MovablePoint::Yield, 9.0, 9.0);
        s.set_columns(Column::Display1, Column::Load1);
        assert_eq!(s.state(), &original);

        s.set_columns(Column::ElapsedTime, Column::Load1);
        assert_eq!(s.analysis().x, Column::ElapsedTime);
    }

    #[test]
    fn export_row_reflects_edits() {
        let mut s = session();
        s.set_point(MovablePoint::Yield, 0.1, 25.0);
        let row = s.export_row();
        assert_eq!(row.file_name, "specimen");
        assert_eq!(row.yield_displacement, Some(0.1));
        assert_eq!(row.yield_strength, Some(25.0));
        assert_eq!(row.max_strength, s.analysis().peak.map(|p| p.max_value));
    }
}
