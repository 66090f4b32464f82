//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed rig column identifiers (`Column`)
//! - curve points and analysis outputs (`CurvePoint`, `SlopeResult`, `PeakPoint`)
//! - run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
