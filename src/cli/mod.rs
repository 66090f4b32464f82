//! Command-line parsing for the rig curve analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::{Delimiter, SampleConfig};
use crate::domain::{AnalysisConfig, Column};

pub mod picker;

/// Environment variable holding the default export CSV path.
pub const EXPORT_ENV: &str = "RIG_EXPORT";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rig", version, about = "Mechanical test-rig displacement/force analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyse one or more rig files and print a summary per file.
    Analyze(AnalyzeArgs),
    /// Launch the interactive TUI for one file.
    ///
    /// Uses the same pipeline as `rig analyze`; slope and yield points can be
    /// moved along the curve and the result appended to the export CSV.
    Tui(TuiArgs),
    /// Write a synthetic rig file.
    Generate(GenerateArgs),
    /// Print the summary stored in a curve JSON.
    Show(ShowArgs),
}

/// Options for batch analysis.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Rig files to analyse.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Displacement (x) column.
    #[arg(short = 'x', long = "x", value_enum, default_value_t = Column::Display1)]
    pub x_column: Column,

    /// Force (y) column; defaults to the load channel that reads negative.
    #[arg(short = 'y', long = "y", value_enum)]
    pub y_column: Option<Column>,

    /// Write one result row per file to this CSV.
    #[arg(long, env = EXPORT_ENV)]
    pub export: Option<PathBuf>,

    /// Write the curve JSON (single input only).
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,

    /// Write a markdown debug bundle per file under `./debug`.
    #[arg(long)]
    pub debug: bool,
}

impl AnalyzeArgs {
    pub fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            inputs: self.files.clone(),
            x_column: self.x_column,
            y_column: self.y_column,
            export_results: self.export.clone(),
            export_curve: self.export_curve.clone(),
            debug: self.debug,
        }
    }
}

/// Options for the interactive view.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Rig file to open; a picker lists candidates when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Displacement (x) column.
    #[arg(short = 'x', long = "x", value_enum, default_value_t = Column::Display1)]
    pub x_column: Column,

    /// Force (y) column; defaults to the load channel that reads negative.
    #[arg(short = 'y', long = "y", value_enum)]
    pub y_column: Option<Column>,

    /// Export CSV written by the `e` key.
    #[arg(long, env = EXPORT_ENV)]
    pub export: Option<PathBuf>,
}

impl TuiArgs {
    pub fn to_config(&self, file: PathBuf) -> AnalysisConfig {
        AnalysisConfig {
            inputs: vec![file],
            x_column: self.x_column,
            y_column: self.y_column,
            export_results: self.export.clone(),
            export_curve: None,
            debug: false,
        }
    }
}

/// Options for synthetic file generation.
#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// Output path.
    #[arg(value_name = "OUT")]
    pub out: PathBuf,

    /// Random seed for the force noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Displacement increment per row.
    #[arg(long, default_value_t = 0.0025)]
    pub step: f64,

    /// Displacement at failure.
    #[arg(long, default_value_t = 0.3)]
    pub failure: f64,

    /// Elastic stiffness.
    #[arg(long, default_value_t = 250.0)]
    pub stiffness: f64,

    /// Displacement at the end of the elastic region.
    #[arg(long = "yield", default_value_t = 0.06)]
    pub yield_disp: f64,

    /// Standard deviation of force noise.
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,

    /// Pre-load slack added to the recorded displacement.
    #[arg(long, default_value_t = 0.02)]
    pub slack: f64,

    /// Channel that records the compressive force.
    #[arg(long, value_enum, default_value_t = Column::Load1)]
    pub load: Column,

    /// Comma-separated rows instead of tab-separated.
    #[arg(long)]
    pub comma: bool,
}

impl GenerateArgs {
    pub fn to_sample_config(&self) -> SampleConfig {
        SampleConfig {
            seed: self.seed,
            step: self.step,
            failure_disp: self.failure,
            stiffness: self.stiffness,
            yield_disp: self.yield_disp,
            noise: self.noise,
            slack: self.slack,
            load_channel: self.load,
            delimiter: if self.comma { Delimiter::Comma } else { Delimiter::Whitespace },
            ..SampleConfig::default()
        }
    }
}

/// Options for printing a saved curve.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Curve JSON file produced by `rig analyze --export-curve`.
    #[arg(value_name = "JSON")]
    pub curve: PathBuf,
}
