//! Data layer: rig columns and synthetic specimens.
//!
//! ```text
//!   cleaned lines (io::ingest)
//!         │
//!         ▼
//!   ┌───────────┐
//!   │  columns  │  delimiter → rows → Dataset → normalize(x, y)
//!   └───────────┘
//!
//!   ┌───────────┐
//!   │  sample   │  seeded synthetic rig files (demos, tests)
//!   └───────────┘
//! ```

pub mod columns;
pub mod sample;

pub use columns::{Dataset, Delimiter};
pub use sample::{SampleConfig, SampleFile, generate_sample};
