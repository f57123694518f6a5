//! Inclusive (all-bins) scale-factor summary.
//!
//! Inclusive values aggregate counts over the entire grid (overflow
//! slices included) *before* dividing; averaging per-bin ratios
//! would weight sparse bins incorrectly. The summary reports one
//! inclusive SF per variation, its percentage deviation from
//! nominal, and a combined total-systematic figure.

use mt_core::{CountPair, Error, Result, Sample, Variation};

use crate::aggregate::{envelope_picks_first, point_eff, resolve_catalogue};
use crate::ratio::{ratio, ZeroDenominator};
use crate::{estimator, BinCountSource};

/// One row of the inclusive table.
#[derive(Debug, Clone, PartialEq)]
pub struct InclusiveLine {
    /// Variation name (`isoEnv` for the envelope pseudo-entry).
    pub name: String,
    /// Inclusive data/mc scale factor for this variation.
    pub scale_factor: f64,
    /// Percentage deviation from the nominal SF; `None` when the
    /// nominal SF is zero (reported as "N/A" rather than divided).
    pub percent_deviation: Option<f64>,
}

/// The inclusive summary for one request.
#[derive(Debug, Clone)]
pub struct InclusiveSummary {
    /// Inclusive nominal data efficiency.
    pub data_efficiency: f64,
    /// Statistical error (upper) on the inclusive data efficiency.
    pub data_stat_error: f64,
    /// Inclusive nominal mc efficiency.
    pub mc_efficiency: f64,
    /// Statistical error (upper) on the inclusive mc efficiency.
    pub mc_stat_error: f64,
    /// Inclusive nominal scale factor.
    pub nominal_sf: f64,
    /// Propagated statistical error on the nominal SF.
    pub nominal_stat_error: f64,
    /// One row per non-nominal variation, plus the isolation
    /// envelope, in catalogue order.
    pub lines: Vec<InclusiveLine>,
    /// `nominal_sf + sqrt(sum (sf_v - nominal_sf)^2)` over the rows.
    pub total_syst: f64,
    /// Percentage deviation of `total_syst` from nominal.
    pub total_percent: Option<f64>,
}

fn percent_deviation(value: f64, nominal: f64) -> Option<f64> {
    if nominal == 0.0 {
        None
    } else {
        Some((value - nominal) / nominal * 100.0)
    }
}

/// Inclusive SF for one variation from whole-grid count totals.
/// Zero probes on either sample, or a zero mc efficiency, zero-fill
/// the value.
fn inclusive_sf(data: CountPair, mc: CountPair) -> Result<f64> {
    let d_eff = ratio(data.matched, data.probes, ZeroDenominator::ZeroFill, "data efficiency")?;
    let m_eff = ratio(mc.matched, mc.probes, ZeroDenominator::ZeroFill, "mc efficiency")?;
    ratio(d_eff, m_eff, ZeroDenominator::ZeroFill, "scale factor")
}

/// Collapse the grid to one aggregate bin per variation and build
/// the inclusive SF table.
///
/// A zero mc inclusive probe count or efficiency makes the whole
/// request degenerate: it is aborted with a logged warning rather
/// than producing a partial table.
pub fn summarize_inclusive(source: &dyn BinCountSource) -> Result<InclusiveSummary> {
    let dims = source.dims();
    let data = resolve_catalogue(source, Sample::Data)?;
    let mc = resolve_catalogue(source, Sample::Mc)?;

    // Nominal inclusive efficiencies with Clopper-Pearson errors.
    let d_eff = estimator::efficiency(data[&Variation::Nominal].totals()).ok_or_else(|| {
        Error::DegenerateRatio("data inclusive probe count is zero".to_string())
    })?;
    let m_eff = match estimator::efficiency(mc[&Variation::Nominal].totals()) {
        Some(e) if e.point != 0.0 => e,
        _ => {
            tracing::warn!("mc inclusive efficiency is zero; aborting inclusive summary");
            return Err(Error::DegenerateRatio("mc inclusive efficiency is zero".to_string()));
        }
    };

    let nominal_sf = d_eff.point / m_eff.point;
    // err_sf = sf * (err_data/eff_data + err_mc/eff_mc); a zero data
    // efficiency contributes a zero error term rather than dividing.
    let d_rel = ratio(d_eff.err_up, d_eff.point, ZeroDenominator::ZeroFill, "data rel. error")?;
    let m_rel = ratio(m_eff.err_up, m_eff.point, ZeroDenominator::ZeroFill, "mc rel. error")?;
    let nominal_stat_error = nominal_sf * (d_rel + m_rel);

    // Isolation-envelope inclusive counts: per bin, accumulate the
    // variant the mc envelope comparison picks (inherited policy;
    // the data-side winner only shapes the per-bin data map).
    let (first, second) = Variation::ISOLATION_PAIR;
    let mc_nominal = mc[&Variation::Nominal];
    let mut iso_data = CountPair::ZERO;
    let mut iso_mc = CountPair::ZERO;
    for bin in dims.bins() {
        let nom = point_eff(mc_nominal, bin);
        let winner = if envelope_picks_first(
            nom,
            point_eff(mc[&first], bin),
            point_eff(mc[&second], bin),
        ) {
            first
        } else {
            second
        };
        iso_data.add(data[&winner].pair(bin));
        iso_mc.add(mc[&winner].pair(bin));
    }

    let mut lines = Vec::new();
    for variation in Variation::non_nominal() {
        let sf = inclusive_sf(data[&variation].totals(), mc[&variation].totals())?;
        lines.push(InclusiveLine {
            name: variation.name().to_string(),
            scale_factor: sf,
            percent_deviation: percent_deviation(sf, nominal_sf),
        });
    }
    let iso_sf = inclusive_sf(iso_data, iso_mc)?;
    lines.push(InclusiveLine {
        name: "isoEnv".to_string(),
        scale_factor: iso_sf,
        percent_deviation: percent_deviation(iso_sf, nominal_sf),
    });

    // The envelope's own inclusive SF participates like any other row.
    let quad: f64 = lines.iter().map(|l| (l.scale_factor - nominal_sf).powi(2)).sum();
    let total_syst = nominal_sf + quad.sqrt();

    tracing::info!(nominal_sf, total_syst, "inclusive summary complete");

    Ok(InclusiveSummary {
        data_efficiency: d_eff.point,
        data_stat_error: d_eff.err_up,
        mc_efficiency: m_eff.point,
        mc_stat_error: m_eff.err_up,
        nominal_sf,
        nominal_stat_error,
        lines,
        total_syst,
        total_percent: percent_deviation(total_syst, nominal_sf),
    })
}
