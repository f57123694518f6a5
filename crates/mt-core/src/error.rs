//! Error types for the trigger efficiency toolkit.

use thiserror::Error;

/// Toolkit error type.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown year/period/region/trigger/quality/variation name.
    /// Rejected before any counting begins.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A required (sample, variation) count grid could not be located.
    /// Always fatal for the request: silently dropping a variation
    /// would understate the systematic uncertainty.
    #[error("missing count source for {sample} variation '{variation}' (expected {expected})")]
    MissingCountSource {
        /// Sample the grid was requested for (`data` or `mc`).
        sample: String,
        /// Name of the variation that could not be located.
        variation: String,
        /// Identifier the provider expected to find (file path, key, ...).
        expected: String,
    },

    /// A denominator that must be non-zero was zero, in a context
    /// whose policy is to abort rather than fill or report a sentinel.
    #[error("degenerate ratio: {0}")]
    DegenerateRatio(String),

    /// Two grids that must share one binning disagree.
    #[error("grid mismatch: {0}")]
    GridMismatch(String),

    /// Numerical failure.
    #[error("computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
