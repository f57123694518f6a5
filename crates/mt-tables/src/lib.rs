//! # mt-tables
//!
//! Static lookup tables for the Run-2 muon trigger efficiency
//! measurement: data-taking periods with their run-number ranges,
//! trigger menus per year (per period where the menu changed
//! mid-year), detector regions, and muon quality working points.
//!
//! [`MeasurementConfig`] is the validation gate: every request is
//! checked against these tables before any counting begins.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod periods;
pub mod triggers;

pub use config::{DetectorRegion, MeasurementConfig, WorkingPoint};
pub use periods::{mc_campaign, period_for_run, DataPeriod, YEARS};
pub use triggers::{or_combinations, TriggerMenu};
