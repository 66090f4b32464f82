//! Elastic window and fixed-segment regression.
//!
//! The elastic region is assumed to lie within a fixed displacement window
//! `(0.01, 0.1)`, valid across the rigs this tool reads. The window is split
//! into four equal segments and the steepest least-squares slope wins.
//!
//! Segment bounds are inclusive on both ends, so a sample sitting exactly on a
//! shared boundary contributes to both neighbours.

use crate::domain::SegmentSlope;
use crate::math::ols_slope;

/// Exclusive displacement bounds of the elastic window.
pub const WINDOW: (f64, f64) = (0.01, 0.1);

/// Width of each regression segment.
pub const SEGMENT_WIDTH: f64 = 0.0225;

/// Regression segments `[start, end]` covering the window.
pub const SEGMENTS: [(f64, f64); 4] = [
    (0.01, 0.0325),
    (0.0325, 0.055),
    (0.055, 0.0775),
    (0.0775, 0.1),
];

/// Samples strictly inside the elastic window, sorted by x (stable).
pub fn elastic_window(points: impl IntoIterator<Item = (f64, f64)>) -> Vec<(f64, f64)> {
    let mut window: Vec<(f64, f64)> = points
        .into_iter()
        .filter(|&(x, _)| x > WINDOW.0 && x < WINDOW.1)
        .collect();
    window.sort_by(|a, b| a.0.total_cmp(&b.0));
    window
}

/// Least-squares slope for each segment of the window.
pub fn segment_slopes(window: &[(f64, f64)]) -> Vec<SegmentSlope> {
    SEGMENTS
        .iter()
        .map(|&(start, end)| {
            let members: Vec<(f64, f64)> = window
                .iter()
                .copied()
                .filter(|&(x, _)| x >= start && x <= end)
                .collect();
            SegmentSlope {
                start,
                end,
                n_points: members.len(),
                slope: ols_slope(&members),
            }
        })
        .collect()
}

/// Steepest segment slope, or `None` if no segment had a usable fit.
pub fn max_segment_slope(segments: &[SegmentSlope]) -> Option<f64> {
    segments
        .iter()
        .filter_map(|s| s.slope)
        .fold(None, |best, s| match best {
            Some(b) if s <= b => Some(b),
            _ => Some(s),
        })
}
