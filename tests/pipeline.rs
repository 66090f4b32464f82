//! End-to-end: generated rig files through load, analysis, export and curve JSON.

use std::fs;
use std::path::PathBuf;

use rig_curves::app::pipeline::load_sessions;
use rig_curves::data::{Delimiter, SampleConfig, generate_sample};
use rig_curves::domain::{AnalysisConfig, Column, MovablePoint};
use rig_curves::io::curve::{read_curve_json, write_curve_json};
use rig_curves::io::export::ExportLog;

fn write_sample(dir: &std::path::Path, name: &str, cfg: &SampleConfig) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, generate_sample(cfg).unwrap().text).unwrap();
    path
}

fn config(inputs: Vec<PathBuf>) -> AnalysisConfig {
    AnalysisConfig {
        inputs,
        x_column: Column::Display1,
        y_column: None,
        export_results: None,
        export_curve: None,
        debug: false,
    }
}

#[test]
fn batch_export_matches_each_file() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_sample(dir.path(), "alpha.1.txt", &SampleConfig::default());
    let b = write_sample(
        dir.path(),
        "beta.csv",
        &SampleConfig {
            seed: 3,
            stiffness: 150.0,
            load_channel: Column::Load2,
            delimiter: Delimiter::Comma,
            ..SampleConfig::default()
        },
    );

    let sessions = load_sessions(&config(vec![a, b])).unwrap();
    assert_eq!(sessions[0].name(), "alpha");
    assert_eq!(sessions[1].name(), "beta");
    assert_eq!(sessions[1].analysis().y, Column::Load2);

    let slope_a = sessions[0].analysis().slope.as_ref().unwrap().max_slope;
    let slope_b = sessions[1].analysis().slope.as_ref().unwrap().max_slope;
    assert!((slope_a - 250.0).abs() < 5.0, "slope_a = {slope_a}");
    assert!((slope_b - 150.0).abs() < 5.0, "slope_b = {slope_b}");

    // Failure drop truncates the tail: no sample past the failure displacement.
    for s in &sessions {
        let max_x = s.analysis().curve().map(|(x, _)| x).fold(f64::NEG_INFINITY, f64::max);
        assert!(max_x <= 0.3 + 1e-9, "max_x = {max_x}");
    }

    let mut log = ExportLog::new();
    for s in &sessions {
        log.push(s.export_row());
    }
    let out = dir.path().join("mechanical property.csv");
    log.write_csv(&out).unwrap();

    let mut reader = csv::Reader::from_path(&out).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["file name", "slope", "area", "yield displacement", "yield strength", "max strength"]
    );
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "alpha");
    let exported_slope: f64 = records[0][1].parse().unwrap();
    assert!((exported_slope - slope_a).abs() < 1e-9);
}

#[test]
fn edited_session_round_trips_through_curve_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), "gamma.txt", &SampleConfig::default());
    let mut sessions = load_sessions(&config(vec![path])).unwrap();
    let session = &mut sessions[0];

    session.step_point(MovablePoint::PointTwo, 4).unwrap();
    let edited = session.state().custom_slope;
    assert_ne!(edited, session.analysis().slope.as_ref().map(|s| s.max_slope));

    let json = dir.path().join("gamma.json");
    write_curve_json(&json, session).unwrap();
    let curve = read_curve_json(&json).unwrap();
    assert_eq!(curve.name, "gamma");
    assert_eq!(curve.points.custom_slope, edited);
    assert_eq!(curve.curve.len(), session.analysis().dataset.len());

    let row = session.export_row();
    assert_eq!(row.slope, edited);
}

#[test]
fn unreadable_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_sessions(&config(vec![dir.path().join("nope.txt")])).unwrap_err();
    assert_eq!(err.exit_code(), rig_curves::error::EXIT_IO);
}
