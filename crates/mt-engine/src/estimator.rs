//! Binomial efficiency estimation.
//!
//! Point estimate is `matched / probes`; the interval is the
//! Clopper-Pearson (exact binomial) interval at 1-sigma two-sided
//! coverage, matching the ROOT `TEfficiency` default used to produce
//! the historical results.

use mt_core::{CountPair, EfficiencyValue};
use statrs::distribution::{Beta, ContinuousCDF};

/// 1-sigma two-sided coverage.
pub const CONFIDENCE_LEVEL: f64 = 0.682_689_492_137_086;

/// Clopper-Pearson bounds for `matched` passes out of `probes`
/// trials at the given coverage.
///
/// Weighted fills make the counts `f64`; the pass count is clamped
/// into `[0, probes]` for the interval (a `matched > probes`
/// violation is a data-quality problem and must not panic here).
/// `probes` must be positive.
pub fn clopper_pearson(matched: f64, probes: f64, level: f64) -> (f64, f64) {
    let alpha = 1.0 - level;
    let k = matched.clamp(0.0, probes);

    let lower = if k <= 0.0 {
        0.0
    } else {
        // Shapes are positive by construction: k > 0 and k <= probes.
        Beta::new(k, probes - k + 1.0)
            .expect("beta shape parameters are positive")
            .inverse_cdf(alpha / 2.0)
    };
    let upper = if k >= probes {
        1.0
    } else {
        Beta::new(k + 1.0, probes - k)
            .expect("beta shape parameters are positive")
            .inverse_cdf(1.0 - alpha / 2.0)
    };
    (lower, upper)
}

/// Point efficiency with asymmetric 1-sigma errors for one count
/// pair.
///
/// Returns `None` when `probes == 0`: a 0/0 bin carries no
/// measurement, and the caller decides the policy (zero-fill a map
/// cell, abort an inclusive summary, ...). It is never silently
/// reported as an efficiency of zero.
pub fn efficiency(counts: CountPair) -> Option<EfficiencyValue> {
    if counts.probes <= 0.0 {
        return None;
    }
    let point = counts.matched / counts.probes;
    let (lower, upper) = clopper_pearson(counts.matched, counts.probes, CONFIDENCE_LEVEL);
    Some(EfficiencyValue {
        point,
        err_up: (upper - point).max(0.0),
        err_low: (point - lower).max(0.0),
    })
}
