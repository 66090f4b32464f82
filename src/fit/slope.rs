//! Maximum elastic slope for one displacement/force column pair.
//!
//! Steps:
//! 1. restrict to the elastic window and regress each fixed segment
//! 2. keep the steepest segment slope (`max_slope`)
//! 3. find the offset supported by the most window points at that slope
//! 4. take the lowest- and highest-x inliers as the slope points, pin the line
//!    through the first one and extend it by half the inlier span each side

use tracing::{debug, warn};

use crate::data::Dataset;
use crate::domain::{Column, CurvePoint, SlopeResult};
use crate::fit::inliers::best_supported_line;
use crate::fit::segments::{elastic_window, max_segment_slope, segment_slopes};
use crate::models::StiffnessLine;

/// Fraction of the inlier span added on each side of the display line.
pub const EXTENSION: f64 = 0.5;

/// Run the slope analysis on a normalized dataset.
///
/// Returns `None` when no segment of the elastic window holds two points.
pub fn analyze_slope(dataset: &Dataset, x: Column, y: Column) -> Option<SlopeResult> {
    let window = elastic_window(dataset.points(x, y));
    let segments = segment_slopes(&window);

    let Some(max_slope) = max_segment_slope(&segments) else {
        warn!(
            window = window.len(),
            "no regression segment has two samples; slope unavailable"
        );
        return None;
    };

    let fit = best_supported_line(&window, max_slope)?;
    let (point_one, point_two) = inlier_extremes(fit.inliers(&window))?;

    let line = StiffnessLine::through(max_slope, point_one.x, point_one.y);
    let span = point_two.x - point_one.x;
    let extended = [
        line.point_at(point_one.x - span * EXTENSION),
        line.point_at(point_two.x + span * EXTENSION),
    ];

    debug!(
        max_slope,
        inliers = fit.count,
        window = window.len(),
        "slope analysis complete"
    );

    Some(SlopeResult {
        max_slope,
        point_one,
        point_two,
        extended,
        offset: line.offset,
        inlier_count: fit.count,
        window_count: window.len(),
        segments,
    })
}

/// First minimum-x and first maximum-x points, in iteration order.
fn inlier_extremes(points: impl Iterator<Item = (f64, f64)>) -> Option<(CurvePoint, CurvePoint)> {
    let mut extremes: Option<((f64, f64), (f64, f64))> = None;
    for p in points {
        extremes = Some(match extremes {
            None => (p, p),
            Some((lo, hi)) => (
                if p.0 < lo.0 { p } else { lo },
                if p.0 > hi.0 { p } else { hi },
            ),
        });
    }
    extremes.map(|(lo, hi)| (CurvePoint::new(lo.0, lo.1), CurvePoint::new(hi.0, hi.1)))
}
