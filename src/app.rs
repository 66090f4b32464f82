//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the analysis pipeline over the inputs
//! - prints reports and writes optional exports

use std::fs;
use std::path::Path;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{AnalyzeArgs, Command, GenerateArgs, ShowArgs, TuiArgs};
use crate::error::{AppError, EXIT_NO_DATA};
use crate::io::export::ExportLog;

pub mod pipeline;

/// Entry point for the `rig` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `rig`, `rig <file>` and `rig -x ...` behave like `rig tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the screen; keep logging quiet unless asked for.
    let default_level = match cli.command {
        Command::Tui(_) => "warn",
        _ => "info",
    };
    init_tracing(default_level);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Tui(args) => handle_tui(args),
        Command::Generate(args) => handle_generate(args),
        Command::Show(args) => handle_show(args),
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = args.to_config();
    if config.export_curve.is_some() && config.inputs.len() != 1 {
        return Err(AppError::io("--export-curve needs exactly one input file."));
    }

    let sessions = pipeline::load_sessions(&config)?;

    let mut log = ExportLog::new();
    for session in &sessions {
        println!("{}", crate::report::format_run_summary(session));
        if session.analysis().dataset.is_empty() {
            warn!(file = session.name(), "no usable samples");
        }
        if config.debug {
            let path = crate::debug::write_debug_bundle(Path::new(crate::debug::DEBUG_DIR), session)?;
            println!("Debug bundle: {}", path.display());
        }
        log.push(session.export_row());
    }

    if sessions.len() > 1 {
        println!("{}", crate::report::format_export_table(log.rows()));
    }

    if let Some(path) = &config.export_results {
        log.write_csv(path)?;
        info!(path = %path.display(), rows = log.len(), "export written");
    }
    if let (Some(path), Some(session)) = (&config.export_curve, sessions.first()) {
        crate::io::curve::write_curve_json(path, session)?;
        info!(path = %path.display(), "curve JSON written");
    }

    if sessions.iter().all(|s| s.analysis().dataset.is_empty()) {
        return Err(AppError::new(EXIT_NO_DATA, "No usable data rows in any input."));
    }
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let file = match &args.file {
        Some(path) => crate::cli::picker::validate_input_path(path)?,
        None => crate::cli::picker::prompt_for_input_path()?,
    };
    crate::tui::run(&args.to_config(file))
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let sample = crate::data::generate_sample(&args.to_sample_config())?;
    fs::write(&args.out, &sample.text)
        .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", args.out.display())))?;
    println!(
        "Wrote {} rows to {} (peak force {:.3}).",
        sample.rows,
        args.out.display(),
        sample.peak_force
    );
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    println!("{}", crate::report::format_curve_file(&curve));
    Ok(())
}

/// Rewrite argv so `rig` defaults to `rig tui`.
///
/// Rules:
/// - `rig`                      -> `rig tui`
/// - `rig data.txt`             -> `rig tui data.txt`
/// - `rig -x load1 ...`         -> `rig tui -x load1 ...`
/// - `rig --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    let is_subcommand = matches!(arg1.as_str(), "analyze" | "tui" | "generate" | "show");
    if is_top_level_help_or_version || is_subcommand {
        return argv;
    }

    argv.insert(1, "tui".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_and_paths_open_tui() {
        assert_eq!(rewrite_args(args(&["rig"])), args(&["rig", "tui"]));
        assert_eq!(rewrite_args(args(&["rig", "a.txt"])), args(&["rig", "tui", "a.txt"]));
        assert_eq!(
            rewrite_args(args(&["rig", "-x", "load1"])),
            args(&["rig", "tui", "-x", "load1"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(rewrite_args(args(&["rig", "--help"])), args(&["rig", "--help"]));
        assert_eq!(
            rewrite_args(args(&["rig", "analyze", "a.txt"])),
            args(&["rig", "analyze", "a.txt"])
        );
    }
}
