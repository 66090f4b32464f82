//! Closed-form simple linear regression.
//!
//! The slope analysis only ever needs the slope of `y = a + b·x` over a
//! handful of samples, so we use the textbook normal-equation form:
//!
//! ```text
//! b = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)
//! ```
//!
//! Sums are accumulated in input order so results are bit-for-bit reproducible.

/// Running sums for a least-squares slope.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlopeSums {
    pub n: usize,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_xy: f64,
    pub sum_xx: f64,
}

impl SlopeSums {
    pub fn push(&mut self, x: f64, y: f64) {
        self.n += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xy += x * y;
        self.sum_xx += x * x;
    }

    /// Least-squares slope, or `None` with fewer than two points or when all
    /// x values coincide.
    pub fn slope(&self) -> Option<f64> {
        if self.n < 2 {
            return None;
        }
        let n = self.n as f64;
        let numer = n * self.sum_xy - self.sum_x * self.sum_y;
        let denom = n * self.sum_xx - self.sum_x * self.sum_x;
        let slope = numer / denom;
        slope.is_finite().then_some(slope)
    }
}

/// Least-squares slope through `points`.
pub fn ols_slope(points: &[(f64, f64)]) -> Option<f64> {
    let mut sums = SlopeSums::default();
    for &(x, y) in points {
        sums.push(x, y);
    }
    sums.slope()
}
