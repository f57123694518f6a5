//! Validated measurement configuration.
//!
//! A [`MeasurementConfig`] is the per-request identity of one
//! aggregation run: (year, period, detector region, trigger, muon
//! quality working point). Construction validates every field
//! against the lookup tables; an invalid request never reaches the
//! engine.

use std::fmt;
use std::str::FromStr;

use mt_core::{Error, Result};

use crate::{periods, triggers};

/// Detector region the probes are restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorRegion {
    /// Full eta coverage.
    All,
    /// Full coverage excluding the barrel/endcap crack.
    NoCrack,
    /// |eta| < 1.05.
    Barrel,
    /// |eta| > 1.05.
    Endcap,
}

impl DetectorRegion {
    /// All regions.
    pub const ALL: [DetectorRegion; 4] = [
        DetectorRegion::All,
        DetectorRegion::NoCrack,
        DetectorRegion::Barrel,
        DetectorRegion::Endcap,
    ];

    /// Canonical name, as used in input directory layouts.
    pub fn name(self) -> &'static str {
        match self {
            DetectorRegion::All => "All",
            DetectorRegion::NoCrack => "noCrack",
            DetectorRegion::Barrel => "Barrel",
            DetectorRegion::Endcap => "Endcap",
        }
    }

    /// Lowercase name, as used in output map keys.
    pub fn lower(self) -> &'static str {
        match self {
            DetectorRegion::All => "all",
            DetectorRegion::NoCrack => "nocrack",
            DetectorRegion::Barrel => "barrel",
            DetectorRegion::Endcap => "endcap",
        }
    }
}

impl fmt::Display for DetectorRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DetectorRegion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DetectorRegion::ALL.into_iter().find(|r| r.name() == s).ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "unknown detector region '{s}'; expected All, noCrack, Barrel, or Endcap"
            ))
        })
    }
}

/// Muon quality working point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingPoint {
    /// Medium quality.
    Medium,
    /// Loose quality.
    Loose,
    /// Tight quality.
    Tight,
    /// High-pT quality.
    HighPt,
}

impl WorkingPoint {
    /// All working points.
    pub const ALL: [WorkingPoint; 4] =
        [WorkingPoint::Medium, WorkingPoint::Loose, WorkingPoint::Tight, WorkingPoint::HighPt];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            WorkingPoint::Medium => "Medium",
            WorkingPoint::Loose => "Loose",
            WorkingPoint::Tight => "Tight",
            WorkingPoint::HighPt => "HighPt",
        }
    }
}

impl fmt::Display for WorkingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkingPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        WorkingPoint::ALL.into_iter().find(|q| q.name() == s).ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "unknown working point '{s}'; expected Medium, Loose, Tight, or HighPt"
            ))
        })
    }
}

/// One validated aggregation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementConfig {
    /// Data-taking year.
    pub year: u16,
    /// Period name within the year.
    pub period: String,
    /// Detector region.
    pub region: DetectorRegion,
    /// Trigger name; may carry an `_RM` suffix for reduced-matching
    /// inputs, which is stripped for output naming.
    pub trigger: String,
    /// Muon quality working point.
    pub quality: WorkingPoint,
}

impl MeasurementConfig {
    /// Validate and build a request. Any unknown field is
    /// [`Error::InvalidConfiguration`]; nothing is counted for a
    /// rejected request.
    pub fn new(year: u16, period: &str, region: &str, trigger: &str, quality: &str) -> Result<Self> {
        periods::validate(year, period)?;
        let region = region.parse()?;
        let quality = quality.parse()?;
        let stem = trigger.strip_suffix("_RM").unwrap_or(trigger);
        triggers::validate_trigger(year, period, stem)?;
        Ok(Self { year, period: period.to_string(), region, trigger: trigger.to_string(), quality })
    }

    /// Trigger name with any `_RM` suffix removed, for output naming.
    pub fn trigger_stem(&self) -> &str {
        self.trigger.strip_suffix("_RM").unwrap_or(&self.trigger)
    }

    /// MC campaign matched to the request's year.
    pub fn mc_campaign(&self) -> &'static str {
        // Year validity was checked at construction.
        periods::mc_campaign(self.year).expect("validated year has a campaign")
    }
}
