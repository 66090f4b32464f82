//! Formatted terminal output for analysis summaries.
//!
//! We keep formatting code in one place so:
//! - the numeric core stays free of presentation
//! - output changes are localized

use crate::domain::{CurvePoint, SegmentSlope};
use crate::io::curve::CurveFile;
use crate::io::export::ExportRow;
use crate::session::Session;

/// Full per-file summary: columns, peak, slope diagnostics, area, points.
pub fn format_run_summary(session: &Session) -> String {
    let analysis = session.analysis();
    let state = session.state();
    let mut out = String::new();

    out.push_str(&format!("=== rig - {} ===\n", session.name()));
    out.push_str(&format!("Columns: x={} | y={}\n", analysis.x, analysis.y));
    out.push_str(&format!("Samples: n={}\n", analysis.dataset.len()));

    match analysis.peak {
        Some(p) => out.push_str(&format!(
            "Max strength: {:.4} at x={:.4} (row {})\n",
            p.max_value, p.max_x, p.index
        )),
        None => out.push_str("Max strength: -\n"),
    }
    out.push_str(&format!("Area: {:.6}\n", analysis.area));

    out.push_str("\nElastic segments:\n");
    match &analysis.slope {
        Some(slope) => {
            out.push_str(&format_segments(&slope.segments, Some(slope.max_slope)));
            out.push_str(&format!(
                "Inliers: {}/{} | offset={:.6}\n",
                slope.inlier_count, slope.window_count, slope.offset
            ));
        }
        None => out.push_str("  (no segment with two or more samples in 0.01 < x < 0.1)\n"),
    }

    out.push_str("\nPoints:\n");
    out.push_str(&format!("- slope point 1: {}\n", fmt_point(state.point_one)));
    out.push_str(&format!("- slope point 2: {}\n", fmt_point(state.point_two)));
    out.push_str(&format!("- yield point  : {}\n", fmt_point(state.yield_point)));
    out.push_str(&format!("- slope        : {}\n", fmt_opt(state.custom_slope, 4)));

    out
}

/// Segment table; the row matching `max_slope` is starred.
pub fn format_segments(segments: &[SegmentSlope], max_slope: Option<f64>) -> String {
    let mut out = String::new();
    out.push_str(format!("  {:<20} {:>6} {:>14}\n", "range", "n", "slope").trim_end());
    out.push('\n');
    out.push_str(format!("  {:-<20} {:-<6} {:-<14}\n", "", "", "").trim_end());
    out.push('\n');

    let mut starred = false;
    for seg in segments {
        let chosen = !starred && seg.slope.is_some() && seg.slope == max_slope;
        starred |= chosen;
        let mark = if chosen { "*" } else { " " };
        out.push_str(
            format!(
                "{mark} {:<20} {:>6} {:>14}\n",
                format!("[{:.4}, {:.4}]", seg.start, seg.end),
                seg.n_points,
                fmt_opt(seg.slope, 4),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// One line per file, as written to the export CSV.
pub fn format_export_table(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<24} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
            "file", "slope", "area", "yield x", "yield y", "max"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<24} {:-<12} {:-<12} {:-<12} {:-<12} {:-<12}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:<24} {:>12} {:>12.4} {:>12} {:>12} {:>12}\n",
                truncate(&r.file_name, 24),
                fmt_opt(r.slope, 4),
                r.area,
                fmt_opt(r.yield_displacement, 4),
                fmt_opt(r.yield_strength, 4),
                fmt_opt(r.max_strength, 4),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Summary of a saved curve JSON.
pub fn format_curve_file(curve: &CurveFile) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ({} {}) ===\n", curve.name, curve.tool, curve.created_at.to_rfc3339()));
    out.push_str(&format!("Columns: x={} | y={}\n", curve.x, curve.y));
    out.push_str(&format!("Samples: n={}\n", curve.curve.len()));
    if let Some(p) = curve.peak {
        out.push_str(&format!("Max strength: {:.4} at x={:.4}\n", p.max_value, p.max_x));
    }
    out.push_str(&format!("Area: {:.6}\n", curve.area));
    if let Some(slope) = &curve.slope {
        out.push_str(&format!("Max slope: {:.4}\n", slope.max_slope));
    }
    out.push_str(&format!("Slope: {}\n", fmt_opt(curve.points.custom_slope, 4)));
    out.push_str(&format!("Yield point: {}\n", fmt_point(curve.points.yield_point)));
    out
}

pub fn fmt_point(p: Option<CurvePoint>) -> String {
    match p {
        Some(p) => format!("({:.4}, {:.4})", p.x, p.y),
        None => "-".to_string(),
    }
}

pub fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_table_stars_first_maximum() {
        let segs = vec![
            SegmentSlope { start: 0.01, end: 0.0325, n_points: 5, slope: Some(180.0) },
            SegmentSlope { start: 0.0325, end: 0.055, n_points: 5, slope: Some(200.0) },
            SegmentSlope { start: 0.055, end: 0.0775, n_points: 5, slope: Some(200.0) },
            SegmentSlope { start: 0.0775, end: 0.1, n_points: 1, slope: None },
        ];
        let table = format_segments(&segs, Some(200.0));
        let rows: Vec<&str> = table.lines().skip(2).collect();
        assert!(rows[1].starts_with('*'));
        assert!(!rows[2].starts_with('*'));
        assert!(rows[3].ends_with('-'));
    }

    #[test]
    fn export_table_shows_missing_as_dash() {
        let rows = vec![ExportRow {
            file_name: "a-very-long-specimen-name-indeed".to_string(),
            slope: None,
            area: 1.5,
            yield_displacement: Some(0.1),
            yield_strength: Some(2.0),
            max_strength: None,
        }];
        let table = format_export_table(&rows);
        let line = table.lines().nth(2).unwrap();
        assert!(line.starts_with("a-very-long-specimen-na."));
        assert!(line.ends_with('-'));
    }

    #[test]
    fn point_formatting() {
        assert_eq!(fmt_point(Some(CurvePoint::new(0.5, 2.0))), "(0.5000, 2.0000)");
        assert_eq!(fmt_point(None), "-");
        assert_eq!(fmt_opt(Some(1.23456), 2), "1.23");
    }
}
