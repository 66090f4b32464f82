//! `rig-curves` library crate.
//!
//! The binary (`rig`) is a thin wrapper around this library so that:
//!
//! - the numeric core is testable without spawning processes or a terminal
//! - the CLI and the TUI share one pipeline (`app::pipeline`)

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod session;
pub mod tui;
