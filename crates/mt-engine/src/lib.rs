//! # mt-engine
//!
//! The systematic efficiency and scale-factor aggregation engine.
//!
//! Given per-bin probe/match counts for the nominal selection and
//! every catalogued systematic variation (data and MC separately),
//! the engine computes per-bin efficiencies with Clopper-Pearson
//! statistical intervals, combines the variations into statistical
//! and systematic envelopes, and optionally derives data/MC scale
//! factors and inclusive (all-bins) summaries.
//!
//! Every stage is a pure, one-shot transformation over in-memory
//! grids; the engine owns no file format and performs no I/O. A
//! failed request has no partial output and is simply re-run by the
//! caller.
//!
//! ```no_run
//! use mt_core::{Result, Sample};
//! use mt_engine::{aggregate_sample, compose_scale_factors, BinCountSource};
//!
//! fn run(source: &dyn BinCountSource) -> Result<()> {
//!     let data = aggregate_sample(source, Sample::Data)?;
//!     let mc = aggregate_sample(source, Sample::Mc)?;
//!     let sf = compose_scale_factors(&data, &mc)?;
//!     println!("{} SF cells", sf.nominal.dims().n_cells());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod estimator;
pub mod inclusive;
pub mod ratio;
pub mod scale_factor;

pub use aggregate::{aggregate_sample, SampleMaps};
pub use estimator::{efficiency, CONFIDENCE_LEVEL};
pub use inclusive::{summarize_inclusive, InclusiveLine, InclusiveSummary};
pub use ratio::{ratio, ZeroDenominator};
pub use scale_factor::{compose_scale_factors, ScaleFactorMaps};

use mt_core::{CountGrid, GridDims, Result, Sample, Variation};

/// Supplies per-bin (matched, probes) count grids for each
/// (sample, variation) of the catalogue.
///
/// Implementations own the storage format; the engine only sees
/// in-memory grids. All grids must share one binning.
pub trait BinCountSource: Sync {
    /// The common binning of every grid.
    fn dims(&self) -> GridDims;

    /// Count grid for one (sample, variation).
    ///
    /// A grid that cannot be located must be reported as
    /// [`mt_core::Error::MissingCountSource`] naming the sample, the
    /// variation, and the identifier the implementation expected to
    /// find; the engine treats it as fatal for the request.
    fn counts(&self, sample: Sample, variation: Variation) -> Result<&CountGrid>;
}
