//! Discrete robust line search at a fixed slope.
//!
//! With the slope fixed, a line is determined by its offset. Every observed
//! point implies one candidate offset (the line through it); the candidate
//! supported by the most points within `INLIER_TOLERANCE` wins. The search is
//! exhaustive over observed points, so it is deterministic and needs no
//! starting guess.

use crate::models::StiffnessLine;

/// Absolute residual below which a point supports a candidate line.
pub const INLIER_TOLERANCE: f64 = 0.05;

/// Best-supported line and the points supporting it.
#[derive(Debug, Clone)]
pub struct InlierFit {
    pub line: StiffnessLine,
    /// Index of the point whose implied offset won.
    pub candidate: usize,
    /// `mask[i]` is true when window point `i` is an inlier.
    pub mask: Vec<bool>,
    pub count: usize,
}

impl InlierFit {
    pub fn inliers<'a>(&'a self, points: &'a [(f64, f64)]) -> impl Iterator<Item = (f64, f64)> + 'a {
        points
            .iter()
            .zip(&self.mask)
            .filter(|(_, keep)| **keep)
            .map(|(p, _)| *p)
    }
}

fn inlier_mask(line: &StiffnessLine, points: &[(f64, f64)]) -> Vec<bool> {
    points
        .iter()
        .map(|&(x, y)| line.residual(x, y).abs() < INLIER_TOLERANCE)
        .collect()
}

/// Search candidate offsets implied by `points` for the given slope.
///
/// Ties keep the earliest candidate. Returns `None` for empty input.
pub fn best_supported_line(points: &[(f64, f64)], slope: f64) -> Option<InlierFit> {
    let mut best: Option<InlierFit> = None;

    for (idx, &(x, y)) in points.iter().enumerate() {
        let line = StiffnessLine::through(slope, x, y);
        let mask = inlier_mask(&line, points);
        let count = mask.iter().filter(|&&m| m).count();

        let better = match &best {
            Some(b) => count > b.count,
            None => count > 0,
        };
        if better {
            best = Some(InlierFit {
                line,
                candidate: idx,
                mask,
                count,
            });
        }
    }

    best
}
