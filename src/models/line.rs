//! Straight-line stiffness model `y = slope·x + offset`.
//!
//! The slope analysis and the interactive shells both evaluate this line, so
//! it lives here as a small value type.

use serde::{Deserialize, Serialize};

use crate::domain::CurvePoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StiffnessLine {
    pub slope: f64,
    pub offset: f64,
}

impl StiffnessLine {
    /// Line with the given slope passing exactly through `(x, y)`.
    pub fn through(slope: f64, x: f64, y: f64) -> Self {
        Self {
            slope,
            offset: y - slope * x,
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.offset
    }

    pub fn residual(&self, x: f64, y: f64) -> f64 {
        y - self.predict(x)
    }

    pub fn point_at(&self, x: f64) -> CurvePoint {
        CurvePoint::new(x, self.predict(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn through_passes_through_point() {
        let line = StiffnessLine::through(250.0, 0.02, 3.0);
        assert!(line.residual(0.02, 3.0).abs() < 1e-12);
        assert!((line.predict(0.04) - 8.0).abs() < 1e-12);
    }
}
