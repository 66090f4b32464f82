//! Area under a sampled curve.
//!
//! Repeated readings at the same nominal displacement are merged before
//! integrating:
//!
//! - samples are grouped by x rendered at 10 decimals
//! - y is averaged within each group (the group keeps the first x seen)
//! - groups are sorted by x and integrated with the trapezoidal rule

use std::collections::HashMap;

/// Merge duplicate x values (10-decimal key) and average their y values.
///
/// Returns the groups sorted by x ascending.
pub fn dedup_average(points: impl IntoIterator<Item = (f64, f64)>) -> Vec<(f64, f64)> {
    // (first x, Σy, count), in first-seen order.
    let mut groups: Vec<(f64, f64, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (x, y) in points {
        // `+ 0.0` folds -0.0 (from sign flipping) into 0.0.
        let key = format!("{:.10}", x + 0.0);
        match index.get(&key) {
            Some(&slot) => {
                let g = &mut groups[slot];
                g.1 += y;
                g.2 += 1;
            }
            None => {
                index.insert(key, groups.len());
                groups.push((x, y, 1));
            }
        }
    }

    let mut merged: Vec<(f64, f64)> = groups
        .into_iter()
        .map(|(x, sum, n)| (x, sum / n as f64))
        .collect();
    merged.sort_by(|a, b| a.0.total_cmp(&b.0));
    merged
}

/// Trapezoidal integral over already-sorted points.
pub fn trapezoid(sorted: &[(f64, f64)]) -> f64 {
    sorted
        .windows(2)
        .map(|w| (w[1].0 - w[0].0) * (w[1].1 + w[0].1) / 2.0)
        .sum()
}

/// Area under the curve after merging duplicate x readings.
pub fn area_under_curve(points: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    trapezoid(&dedup_average(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_area() {
        let area = area_under_curve([(0.0, 0.0), (1.0, 2.0), (2.0, 0.0)]);
        assert!((area - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_and_single_point_have_zero_area() {
        assert_eq!(area_under_curve(std::iter::empty()), 0.0);
        assert_eq!(area_under_curve([(3.0, 7.0)]), 0.0);
        // Many readings at one x collapse to a single group.
        assert_eq!(area_under_curve([(1.0, 1.0), (1.0, 3.0)]), 0.0);
    }

    #[test]
    fn duplicates_are_averaged_and_unsorted_input_is_sorted() {
        let merged = dedup_average([(1.0, 4.0), (0.0, 0.0), (1.0, 2.0), (1.00000000001, 6.0)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], (0.0, 0.0));
        assert_eq!(merged[1].0, 1.0);
        assert!((merged[1].1 - 4.0).abs() < 1e-12);

        let area = trapezoid(&merged);
        assert!((area - 2.0).abs() < 1e-12);
    }
}
