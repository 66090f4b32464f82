//! Elastic slope detection.
//!
//! Responsibilities:
//!
//! - restrict to the elastic window and regress fixed segments (`segments`)
//! - robust fixed-slope line search over observed offsets (`inliers`)
//! - endpoint selection and display-line extension (`slope`)

pub mod inliers;
pub mod segments;
pub mod slope;

pub use inliers::*;
pub use segments::*;
pub use slope::*;
