//! Debug bundle writer for inspecting one analysed file.
//!
//! The bundle is a markdown file with the column pair, segment regressions,
//! the full inlier search (one row per candidate offset), and the normalized
//! curve. It is meant to be diffed between runs or attached to a bug report.

use std::fmt::Write as _;
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::AppError;
use crate::fit::{INLIER_TOLERANCE, best_supported_line, elastic_window};
use crate::models::StiffnessLine;
use crate::session::Session;

/// Default bundle directory (relative to the working directory).
pub const DEBUG_DIR: &str = "debug";

/// Write a bundle for `session` under `dir` and return its path.
pub fn write_debug_bundle(dir: &Path, session: &Session) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::io(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("rig_debug_{}_{}.md", sanitize(session.name()), ts));

    fs::write(&path, render_bundle(session))
        .map_err(|e| AppError::io(format!("Failed to write debug file '{}': {e}", path.display())))?;
    info!(path = %path.display(), "debug bundle written");
    Ok(path)
}

/// Markdown body of the bundle.
pub fn render_bundle(session: &Session) -> String {
    let analysis = session.analysis();
    let state = session.state();
    let mut out = String::new();

    let _ = writeln!(out, "# rig debug bundle");
    let _ = writeln!(out, "- generated: {}", Local::now().to_rfc3339());
    let _ = writeln!(out, "- file: {}", session.name());
    let _ = writeln!(out, "- x: {} | y: {}", analysis.x, analysis.y);
    let _ = writeln!(out, "- samples: {}", analysis.dataset.len());
    let _ = writeln!(out, "- area: {:.6}", analysis.area);
    if let Some(p) = analysis.peak {
        let _ = writeln!(out, "- peak: {:.4} at x={:.6} (row {})", p.max_value, p.max_x, p.index);
    }
    let _ = writeln!(out, "- edited: {}", state.is_edited());

    let _ = writeln!(out, "\n## Segments");
    let _ = writeln!(out, "| start | end | n | slope |");
    let _ = writeln!(out, "| - | - | - | - |");
    match &analysis.slope {
        Some(slope) => {
            for seg in &slope.segments {
                let _ = writeln!(
                    out,
                    "| {:.4} | {:.4} | {} | {} |",
                    seg.start,
                    seg.end,
                    seg.n_points,
                    fmt_opt(seg.slope)
                );
            }
        }
        None => {
            let _ = writeln!(out, "| - | - | 0 | - |");
        }
    }

    let window = elastic_window(analysis.curve());
    let _ = writeln!(out, "\n## Inlier search (tolerance {INLIER_TOLERANCE})");
    match &analysis.slope {
        Some(slope) => {
            let fit = best_supported_line(&window, slope.max_slope);
            let _ = writeln!(out, "| # | x | y | offset | support | chosen | inlier |");
            let _ = writeln!(out, "| - | - | - | - | - | - | - |");
            for (i, &(x, y)) in window.iter().enumerate() {
                let line = StiffnessLine::through(slope.max_slope, x, y);
                let support = window
                    .iter()
                    .filter(|&&(px, py)| line.residual(px, py).abs() < INLIER_TOLERANCE)
                    .count();
                let chosen = fit.as_ref().is_some_and(|f| f.candidate == i);
                let inlier = fit.as_ref().is_some_and(|f| f.mask[i]);
                let _ = writeln!(
                    out,
                    "| {i} | {x:.6} | {y:.6} | {:.6} | {support} | {} | {} |",
                    line.offset,
                    if chosen { "*" } else { "" },
                    if inlier { "y" } else { "" },
                );
            }
            let _ = writeln!(
                out,
                "\nmax_slope={:.6} point_one=({:.6}, {:.6}) point_two=({:.6}, {:.6})",
                slope.max_slope, slope.point_one.x, slope.point_one.y, slope.point_two.x, slope.point_two.y
            );
        }
        None => {
            let _ = writeln!(out, "no slope: {} samples in window", window.len());
        }
    }

    let _ = writeln!(out, "\n## Interactive points");
    let _ = writeln!(out, "| point | x | y |");
    let _ = writeln!(out, "| - | - | - |");
    for (label, p) in [
        ("slope point 1", state.point_one),
        ("slope point 2", state.point_two),
        ("yield point", state.yield_point),
    ] {
        let (x, y) = match p {
            Some(p) => (format!("{:.6}", p.x), format!("{:.6}", p.y)),
            None => ("-".to_string(), "-".to_string()),
        };
        let _ = writeln!(out, "| {label} | {x} | {y} |");
    }
    let _ = writeln!(out, "custom_slope={}", fmt_opt(state.custom_slope));

    let _ = writeln!(out, "\n## Curve");
    let _ = writeln!(out, "| row | x | y |");
    let _ = writeln!(out, "| - | - | - |");
    for (i, (x, y)) in analysis.curve().enumerate() {
        let _ = writeln!(out, "| {i} | {x:.6} | {y:.6} |");
    }

    out
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}
