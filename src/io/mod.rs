//! Input/output helpers.
//!
//! - rig-file ingest (`ingest`)
//! - result export log as CSV (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
