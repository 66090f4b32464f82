//! Column model: parse cleaned lines into fixed rig columns and normalize the
//! displacement/force pair.
//!
//! Parsing never fails. Rows that do not yield exactly five finite numbers are
//! dropped, and normalization of an empty dataset is a no-op.

use tracing::debug;

use crate::domain::Column;

/// First-sample displacement above which the pre-load slack is removed.
const SLACK_THRESHOLD: f64 = 0.005;

/// Force drop between adjacent samples (after the peak) treated as failure.
const FAILURE_DROP: f64 = 1.0;

/// Number of numeric fields in a data row (after the index field).
const ROW_ARITY: usize = 5;

/// Field separator, chosen once per file from the first retained line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Whitespace,
}

/// Index-aligned columns of one rig file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: [Vec<f64>; ROW_ARITY],
}

impl Dataset {
    pub fn from_rows(rows: &[[f64; ROW_ARITY]]) -> Self {
        let mut columns: [Vec<f64>; ROW_ARITY] = Default::default();
        for row in rows {
            for (col, value) in columns.iter_mut().zip(row) {
                col.push(*value);
            }
        }
        Self { columns }
    }

    pub fn column(&self, column: Column) -> &[f64] {
        &self.columns[column.index()]
    }

    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(x, y)` pairs for the selected columns.
    pub fn points(&self, x: Column, y: Column) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.column(x)
            .iter()
            .copied()
            .zip(self.column(y).iter().copied())
    }

    fn column_mut(&mut self, column: Column) -> &mut Vec<f64> {
        &mut self.columns[column.index()]
    }

    fn truncate(&mut self, len: usize) {
        for col in &mut self.columns {
            col.truncate(len);
        }
    }
}

/// Pick the delimiter from the first line: comma if present, else whitespace.
pub fn detect_delimiter(lines: &[String]) -> Delimiter {
    match lines.first() {
        Some(line) if line.contains(',') => Delimiter::Comma,
        _ => Delimiter::Whitespace,
    }
}

/// Parse one data line into the five rig values.
pub fn parse_row(line: &str, delimiter: Delimiter) -> Option<[f64; ROW_ARITY]> {
    let tokens: Vec<&str> = match delimiter {
        Delimiter::Comma => line
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect(),
        Delimiter::Whitespace => line.split_whitespace().collect(),
    };

    let fields = tokens.get(1..)?;
    let fields = &fields[..fields.len().min(ROW_ARITY)];
    if fields.len() != ROW_ARITY {
        return None;
    }

    let mut row = [0.0; ROW_ARITY];
    for (slot, token) in row.iter_mut().zip(fields) {
        let value = token.parse::<f64>().ok()?;
        if !value.is_finite() {
            return None;
        }
        *slot = value;
    }
    Some(row)
}

/// Parse all cleaned lines, dropping rows that are not exactly five numbers.
pub fn parse_dataset(lines: &[String]) -> Dataset {
    let delimiter = detect_delimiter(lines);
    let rows: Vec<[f64; ROW_ARITY]> = lines
        .iter()
        .filter_map(|line| parse_row(line, delimiter))
        .collect();

    debug!(
        ?delimiter,
        lines = lines.len(),
        rows = rows.len(),
        "parsed rig rows"
    );
    Dataset::from_rows(&rows)
}

/// Choose the live force channel from the first accepted row.
///
/// The rig records compression as negative on exactly one of the two load
/// channels.
pub fn preferred_load_column(lines: &[String]) -> Column {
    let delimiter = detect_delimiter(lines);
    let Some(first) = lines.iter().find_map(|line| parse_row(line, delimiter)) else {
        return Column::Load1;
    };

    if first[Column::Load1.index()] < 0.0 {
        Column::Load1
    } else if first[Column::Load2.index()] < 0.0 {
        Column::Load2
    } else {
        Column::Load1
    }
}

/// Index of the first maximum of `values`.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in values.iter().enumerate() {
        match best {
            Some((_, cur)) if v <= cur => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Index of the first adjacent drop greater than `FAILURE_DROP` after `peak`.
pub fn failure_index(y: &[f64], peak: usize) -> Option<usize> {
    (peak + 1..y.len()).find(|&i| y[i - 1] - y[i] > FAILURE_DROP)
}

/// Apply sign convention, slack removal and post-failure truncation.
///
/// Y is negated, then X. When both name the same column it is negated twice
/// and keeps its raw sign.
pub fn normalize(mut dataset: Dataset, x: Column, y: Column) -> Dataset {
    negate(dataset.column_mut(y));
    negate(dataset.column_mut(x));

    let first_x = dataset.column(x).first().copied();
    if let Some(offset) = first_x.filter(|&v| v > SLACK_THRESHOLD) {
        for v in dataset.column_mut(x).iter_mut() {
            *v -= offset;
        }
        debug!(offset, "removed pre-load slack");
    }

    if let Some(peak) = argmax(dataset.column(y)) {
        if let Some(cut) = failure_index(dataset.column(y), peak) {
            debug!(peak, cut, "truncating after failure drop");
            dataset.truncate(cut);
        }
    }

    dataset
}

fn negate(values: &mut [f64]) {
    for v in values.iter_mut() {
        *v = -*v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_row_tab_and_comma() {
        let tab = parse_row("7\t1\t2\t3\t-4\t5", Delimiter::Whitespace).unwrap();
        assert_eq!(tab, [1.0, 2.0, 3.0, -4.0, 5.0]);

        let comma = parse_row("7, 1,2,3,-4,5", Delimiter::Comma).unwrap();
        assert_eq!(comma, [1.0, 2.0, 3.0, -4.0, 5.0]);
    }

    #[test]
    fn parse_row_rejects_short_and_non_numeric() {
        assert!(parse_row("1\t2\t3\t4\t5", Delimiter::Whitespace).is_none());
        assert!(parse_row("1\t2\tx\t4\t5\t6", Delimiter::Whitespace).is_none());
        assert!(parse_row("1\t2\tNaN\t4\t5\t6", Delimiter::Whitespace).is_none());
        assert!(parse_row("1\t2\tinf\t4\t5\t6", Delimiter::Whitespace).is_none());
    }

    #[test]
    fn parse_row_ignores_extra_fields() {
        let row = parse_row("1\t2\t3\t4\t5\t6\t7\tjunk", Delimiter::Whitespace).unwrap();
        assert_eq!(row, [2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn delimiter_detection_is_stable() {
        let tabbed = lines(&["1\t0.5\t0.5\t0.1\t-1\t0", "2\t0.6\t0.6\t0.2\t-2\t0"]);
        assert_eq!(detect_delimiter(&tabbed), Delimiter::Whitespace);
        assert_eq!(parse_dataset(&tabbed).len(), 2);

        let comma = lines(&["1,0.5,0.5,0.1,-1,0", "2,0.6,0.6,0.2,-2,0"]);
        assert_eq!(detect_delimiter(&comma), Delimiter::Comma);
        assert_eq!(parse_dataset(&comma).len(), 2);

        // A comma file never parses as whitespace and vice versa.
        assert!(parse_row(&comma[0], Delimiter::Whitespace).is_none());
        assert!(parse_row(&tabbed[0], Delimiter::Comma).is_none());
    }

    #[test]
    fn preferred_load_picks_negative_channel() {
        let load1 = lines(&["1\t0\t0\t0\t-0.2\t0.3"]);
        assert_eq!(preferred_load_column(&load1), Column::Load1);

        let load2 = lines(&["junk", "1\t0\t0\t0\t0.2\t-0.3"]);
        assert_eq!(preferred_load_column(&load2), Column::Load2);

        let neither = lines(&["1\t0\t0\t0\t0.2\t0.3"]);
        assert_eq!(preferred_load_column(&neither), Column::Load1);

        assert_eq!(preferred_load_column(&[]), Column::Load1);
    }

    #[test]
    fn normalize_flips_signs_and_removes_slack() {
        let ds = Dataset::from_rows(&[
            [0.0, 0.0, -0.02, -1.0, 0.0],
            [1.0, 1.0, -0.03, -2.0, 0.0],
            [2.0, 2.0, -0.04, -3.0, 0.0],
        ]);
        let out = normalize(ds, Column::Display1, Column::Load1);

        let x = out.column(Column::Display1);
        assert_eq!(x[0], 0.0);
        assert!((x[1] - 0.01).abs() < 1e-12);
        assert!((x[2] - 0.02).abs() < 1e-12);
        assert_eq!(out.column(Column::Load1), &[1.0, 2.0, 3.0]);
        // Other columns are untouched.
        assert_eq!(out.column(Column::ElapsedTime), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn normalize_keeps_small_initial_offset() {
        let ds = Dataset::from_rows(&[[0.0, 0.0, -0.004, -1.0, 0.0], [0.0, 0.0, -0.01, -2.0, 0.0]]);
        let out = normalize(ds, Column::Display1, Column::Load1);
        assert_eq!(out.column(Column::Display1), &[0.004, 0.01]);
    }

    #[test]
    fn normalize_truncates_after_failure_drop() {
        // Force rises to a peak of 5.0, then drops by 2.5 -> truncate there.
        let forces = [-1.0, -2.0, -5.0, -4.5, -2.0, -1.9];
        let rows: Vec<[f64; 5]> = forces
            .iter()
            .enumerate()
            .map(|(i, &f)| [i as f64, i as f64, -0.001 * i as f64, f, 0.0])
            .collect();
        let out = normalize(Dataset::from_rows(&rows), Column::Display1, Column::Load1);

        assert_eq!(out.len(), 4);
        for col in Column::ALL {
            assert_eq!(out.column(col).len(), 4);
        }
        let y = out.column(Column::Load1);
        assert_eq!(y, &[1.0, 2.0, 5.0, 4.5]);
        let idx = argmax(y).unwrap();
        assert_eq!(y[idx], 5.0);
        for w in y.windows(2).skip(idx) {
            assert!(w[0] - w[1] <= 1.0);
        }
    }

    #[test]
    fn drop_before_peak_is_not_failure() {
        let y = [0.0, 3.0, 1.0, 6.0, 5.5];
        assert_eq!(failure_index(&y, argmax(&y).unwrap()), None);
    }

    #[test]
    fn argmax_first_occurrence() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn shared_column_keeps_raw_sign() {
        let ds = Dataset::from_rows(&[[0.0, 0.0, 0.0, -1.0, 0.0], [1.0, 1.0, 0.0, -2.0, 0.0]]);
        let out = normalize(ds, Column::Load1, Column::Load1);
        // Raw first value is below the slack threshold, so no shift either.
        assert_eq!(out.column(Column::Load1), &[-1.0, -2.0]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn normalize_tolerates_empty_and_single() {
        let empty = normalize(Dataset::default(), Column::Display1, Column::Load1);
        assert!(empty.is_empty());

        let one = normalize(
            Dataset::from_rows(&[[0.0, 0.0, -0.2, -1.0, 0.0]]),
            Column::Display1,
            Column::Load1,
        );
        assert_eq!(one.column(Column::Display1), &[0.0]);
        assert_eq!(one.column(Column::Load1), &[1.0]);
    }
}
