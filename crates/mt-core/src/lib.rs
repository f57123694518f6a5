//! # mt-core
//!
//! Core types for the muon trigger efficiency toolkit: the error
//! type, the closed catalogue of systematic variations, and the
//! grid/count/efficiency data model shared by every stage of the
//! measurement.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;
pub mod variation;

pub use error::{Error, Result};
pub use types::{BinIndex, CountGrid, CountPair, EfficiencyValue, GridDims, Map2D, Sample};
pub use variation::Variation;

/// Crate version, for CLI `version` output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
