//! Curve models evaluated by the analysis and the shells.

pub mod line;

pub use line::*;
