//! Mathematical utilities: least-squares slope and trapezoidal area.

pub mod ols;
pub mod trapz;

pub use ols::*;
pub use trapz::*;
