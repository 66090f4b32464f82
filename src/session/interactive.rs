//! User-movable overlay points.
//!
//! Holds the two stiffness-line points and the yield point. Edits are
//! unvalidated; shells snap pointer/key positions to real samples (see
//! `SampleIndex`) before calling `set_point`.

use serde::Serialize;

use crate::domain::{CurvePoint, MovablePoint, SlopeResult};

/// Values the state returns to on `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Seed {
    point_one: Option<CurvePoint>,
    point_two: Option<CurvePoint>,
    yield_point: Option<CurvePoint>,
    slope: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractiveState {
    seed: Seed,
    pub point_one: Option<CurvePoint>,
    pub point_two: Option<CurvePoint>,
    pub yield_point: Option<CurvePoint>,
    /// Current stiffness; starts at the computed maximum slope.
    pub custom_slope: Option<f64>,
}

impl InteractiveState {
    pub fn seeded(slope: Option<&SlopeResult>, yield_point: Option<CurvePoint>) -> Self {
        let seed = Seed {
            point_one: slope.map(|s| s.point_one),
            point_two: slope.map(|s| s.point_two),
            yield_point,
            slope: slope.map(|s| s.max_slope),
        };
        Self {
            seed,
            point_one: seed.point_one,
            point_two: seed.point_two,
            yield_point: seed.yield_point,
            custom_slope: seed.slope,
        }
    }

    pub fn point(&self, which: MovablePoint) -> Option<CurvePoint> {
        match which {
            MovablePoint::PointOne => self.point_one,
            MovablePoint::PointTwo => self.point_two,
            MovablePoint::Yield => self.yield_point,
        }
    }

    /// Overwrite one movable point.
    pub fn set_point(&mut self, which: MovablePoint, x: f64, y: f64) {
        let p = Some(CurvePoint::new(x, y));
        match which {
            MovablePoint::PointOne => self.point_one = p,
            MovablePoint::PointTwo => self.point_two = p,
            MovablePoint::Yield => self.yield_point = p,
        }
    }

    /// Slope through the current slope points.
    ///
    /// Coincident x values give a non-finite slope; callers decide how to show it.
    pub fn recompute_custom_slope(&mut self) -> Option<f64> {
        if let (Some(p1), Some(p2)) = (self.point_one, self.point_two) {
            self.custom_slope = Some((p2.y - p1.y) / (p2.x - p1.x));
        }
        self.custom_slope
    }

    /// Discard edits and return to the seeded values.
    pub fn reset(&mut self) {
        self.point_one = self.seed.point_one;
        self.point_two = self.seed.point_two;
        self.yield_point = self.seed.yield_point;
        self.custom_slope = self.seed.slope;
    }

    pub fn is_edited(&self) -> bool {
        self.point_one != self.seed.point_one
            || self.point_two != self.seed.point_two
            || self.yield_point != self.seed.yield_point
            || self.custom_slope.map(f64::to_bits) != self.seed.slope.map(f64::to_bits)
    }
}

/// Samples ordered by x for nearest-sample lookups.
#[derive(Debug, Clone)]
pub struct SampleIndex {
    xs: Vec<f64>,
    order: Vec<usize>,
}

impl SampleIndex {
    pub fn new(xs: &[f64]) -> Self {
        let mut order: Vec<usize> = (0..xs.len()).collect();
        order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));
        Self {
            xs: xs.to_vec(),
            order,
        }
    }

    /// Dataset index of the sample whose x is closest to `x`; ties go to the higher x.
    pub fn nearest(&self, x: f64) -> Option<usize> {
        if self.order.is_empty() || x.is_nan() {
            return None;
        }
        let lo = self.order.partition_point(|&i| self.xs[i] < x);
        let lo = lo.min(self.order.len() - 1);

        let mut best = self.order[lo];
        let mut best_dist = (self.xs[best] - x).abs();
        if lo > 0 {
            let prev = self.order[lo - 1];
            let d = (self.xs[prev] - x).abs();
            if d < best_dist {
                best = prev;
                best_dist = d;
            }
        }
        if lo + 1 < self.order.len() {
            let next = self.order[lo + 1];
            if (self.xs[next] - x).abs() < best_dist {
                best = next;
            }
        }
        Some(best)
    }

    /// Dataset index `delta` positions away from `index` in x order (clamped).
    pub fn step(&self, index: usize, delta: isize) -> Option<usize> {
        let pos = self.order.iter().position(|&i| i == index)?;
        let last = self.order.len() as isize - 1;
        let target = (pos as isize + delta).clamp(0, last);
        Some(self.order[target as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope_result() -> SlopeResult {
        SlopeResult {
            max_slope: 200.0,
            point_one: CurvePoint::new(0.02, 4.0),
            point_two: CurvePoint::new(0.05, 10.1),
            extended: [CurvePoint::new(0.005, 1.0), CurvePoint::new(0.065, 13.0)],
            offset: 0.0,
            inlier_count: 10,
            window_count: 12,
            segments: Vec::new(),
        }
    }

    #[test]
    fn seeded_from_slope_result() {
        let state = InteractiveState::seeded(Some(&slope_result()), Some(CurvePoint::new(0.0, 0.1)));
        assert_eq!(state.point_one, Some(CurvePoint::new(0.02, 4.0)));
        assert_eq!(state.point_two, Some(CurvePoint::new(0.05, 10.1)));
        assert_eq!(state.yield_point, Some(CurvePoint::new(0.0, 0.1)));
        assert_eq!(state.custom_slope, Some(200.0));
        assert!(!state.is_edited());
    }

    #[test]
    fn recompute_uses_current_points() {
        let mut state = InteractiveState::seeded(Some(&slope_result()), None);
        state.set_point(MovablePoint::PointTwo, 0.04, 8.0);
        let s = state.recompute_custom_slope().unwrap();
        assert!((s - 200.0).abs() < 1e-9);

        state.set_point(MovablePoint::PointTwo, 0.02, 9.0);
        let s = state.recompute_custom_slope().unwrap();
        assert!(!s.is_finite());
    }

    #[test]
    fn reset_round_trip() {
        let mut state = InteractiveState::seeded(Some(&slope_result()), Some(CurvePoint::new(0.0, 0.1)));
        let mut baseline = state.clone();
        let baseline_slope = baseline.recompute_custom_slope();

        state.set_point(MovablePoint::PointOne, 0.03, 5.0);
        state.set_point(MovablePoint::Yield, 0.2, 30.0);
        state.recompute_custom_slope();
        state.set_point(MovablePoint::PointTwo, 0.09, 1.0);
        assert!(state.is_edited());

        state.reset();
        assert_eq!(state.point_one, baseline.point_one);
        assert_eq!(state.point_two, baseline.point_two);
        assert_eq!(state.yield_point, baseline.yield_point);
        assert_eq!(state.custom_slope, Some(200.0));
        assert!(!state.is_edited());
        assert_eq!(state.recompute_custom_slope(), baseline_slope);
    }

    #[test]
    fn no_slope_result_leaves_points_empty() {
        let mut state = InteractiveState::seeded(None, Some(CurvePoint::new(0.0, 0.0)));
        assert_eq!(state.point_one, None);
        assert_eq!(state.recompute_custom_slope(), None);
        state.set_point(MovablePoint::Yield, 1.0, 2.0);
        state.reset();
        assert_eq!(state.yield_point, Some(CurvePoint::new(0.0, 0.0)));
    }

    #[test]
    fn nearest_sample_snaps_by_x() {
        let xs = [0.3, 0.0, 0.1, 0.2];
        let index = SampleIndex::new(&xs);
        assert_eq!(index.nearest(0.14), Some(2));
        assert_eq!(index.nearest(0.16), Some(3));
        assert_eq!(SampleIndex::new(&[0.0, 1.0]).nearest(0.5), Some(1));
        assert_eq!(SampleIndex::new(&[0.0, 0.5, 1.0]).nearest(0.75), Some(2));
        assert_eq!(index.nearest(-5.0), Some(1));
        assert_eq!(index.nearest(5.0), Some(0));
        assert_eq!(SampleIndex::new(&[]).nearest(0.0), None);
    }

    #[test]
    fn step_walks_x_order() {
        let xs = [0.3, 0.0, 0.1, 0.2];
        let index = SampleIndex::new(&xs);
        assert_eq!(index.step(1, 1), Some(2));
        assert_eq!(index.step(2, 2), Some(0));
        assert_eq!(index.step(0, 3), Some(0));
        assert_eq!(index.step(2, -5), Some(1));
    }
}
