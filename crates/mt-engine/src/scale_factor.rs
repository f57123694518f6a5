//! Data/MC scale-factor maps with propagated uncertainties.
//!
//! Scale factors are derived, never independently measured: every
//! map here is an element-wise function of the data and MC map
//! families. Bins where the MC nominal efficiency is zero are
//! explicitly zero-filled (an intentional degenerate-case policy,
//! not a missing value).

use std::collections::BTreeMap;

use mt_core::{Error, Map2D, Result, Variation};

use crate::aggregate::SampleMaps;
use crate::ratio::{ratio, ZeroDenominator};

/// The scale-factor map family, parallel to [`SampleMaps`].
#[derive(Debug, Clone)]
pub struct ScaleFactorMaps {
    /// `data.nominal / mc.nominal` per bin.
    pub nominal: Map2D,
    /// Nominal SF plus the propagated statistical error.
    pub stat_up: Map2D,
    /// Nominal SF minus the propagated statistical error.
    pub stat_down: Map2D,
    /// Nominal SF plus the propagated systematic error.
    pub syst_up: Map2D,
    /// Nominal SF minus the propagated systematic error.
    pub syst_down: Map2D,
    /// Element-wise data/mc isolation-envelope ratio.
    pub iso_env: Map2D,
    /// Element-wise data/mc ratio per raw variation. The variation's
    /// dispersion is already its contribution to the systematic
    /// envelope; no further error propagation happens here.
    pub variations: BTreeMap<Variation, Map2D>,
}

/// Relative-error-sum propagation:
/// `err_sf = sf * (data_err/data_nom + mc_err/mc_nom)`.
///
/// Zero denominators contribute nothing (the bin's SF is zero in
/// those cases anyway).
fn propagated_error(sf: f64, d_nom: f64, d_err: f64, m_nom: f64, m_err: f64) -> Result<f64> {
    let d_rel = ratio(d_err, d_nom, ZeroDenominator::ZeroFill, "data relative error")?;
    let m_rel = ratio(m_err, m_nom, ZeroDenominator::ZeroFill, "mc relative error")?;
    Ok(sf * (d_rel + m_rel))
}

fn divide_maps(data: &Map2D, mc: &Map2D) -> Result<Map2D> {
    let mut out = Map2D::zeros(data.dims());
    for bin in data.dims().bins() {
        out.set(bin, ratio(data.get(bin), mc.get(bin), ZeroDenominator::ZeroFill, "sf")?);
    }
    Ok(out)
}

/// Build the scale-factor map family from the two sample families.
pub fn compose_scale_factors(data: &SampleMaps, mc: &SampleMaps) -> Result<ScaleFactorMaps> {
    let dims = data.nominal.dims();
    if mc.nominal.dims() != dims {
        return Err(Error::GridMismatch(format!(
            "data grid is {dims:?} but mc grid is {:?}",
            mc.nominal.dims()
        )));
    }
    tracing::debug!(cells = dims.n_cells(), "composing scale factors");

    let mut nominal = Map2D::zeros(dims);
    let mut stat_up = Map2D::zeros(dims);
    let mut stat_down = Map2D::zeros(dims);
    let mut syst_up = Map2D::zeros(dims);
    let mut syst_down = Map2D::zeros(dims);

    for bin in dims.bins() {
        let d_nom = data.nominal.get(bin);
        let m_nom = mc.nominal.get(bin);
        if m_nom == 0.0 {
            // Leave the whole bin zero-filled.
            continue;
        }
        let sf = d_nom / m_nom;
        nominal.set(bin, sf);

        // Statistical half-widths per sample.
        let err_up = propagated_error(
            sf,
            d_nom,
            data.stat_up.get(bin) - d_nom,
            m_nom,
            mc.stat_up.get(bin) - m_nom,
        )?;
        let err_down = propagated_error(
            sf,
            d_nom,
            d_nom - data.stat_down.get(bin),
            m_nom,
            m_nom - mc.stat_down.get(bin),
        )?;
        stat_up.set(bin, sf + err_up);
        stat_down.set(bin, sf - err_down);

        // Systematic half-widths are symmetric by construction; a
        // half-width of exactly zero on either side zero-fills the
        // bin rather than claiming a zero-uncertainty ratio.
        let d_syst = data.syst_up.get(bin) - d_nom;
        let m_syst = mc.syst_up.get(bin) - m_nom;
        if d_syst != 0.0 && m_syst != 0.0 {
            let err = propagated_error(sf, d_nom, d_syst, m_nom, m_syst)?;
            syst_up.set(bin, sf + err);
            syst_down.set(bin, sf - err);
        }
    }

    let mut variations = BTreeMap::new();
    for variation in Variation::non_nominal() {
        variations.insert(
            variation,
            divide_maps(&data.variations[&variation], &mc.variations[&variation])?,
        );
    }

    Ok(ScaleFactorMaps {
        nominal,
        stat_up,
        stat_down,
        syst_up,
        syst_down,
        iso_env: divide_maps(&data.iso_env, &mc.iso_env)?,
        variations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mt_core::{BinIndex, GridDims, Sample};

    fn flat_maps(sample: Sample, dims: GridDims, nominal: f64, stat_err: f64, syst: f64) -> SampleMaps {
        let fill = |v: f64| {
            let mut m = Map2D::zeros(dims);
            for bin in dims.bins() {
                m.set(bin, v);
            }
            m
        };
        SampleMaps {
            sample,
            nominal: fill(nominal),
            stat_up: fill(nominal + stat_err),
            stat_down: fill(nominal - stat_err),
            syst_up: fill(nominal + syst),
            syst_down: fill(nominal - syst),
            iso_env: fill(nominal),
            variations: Variation::non_nominal().map(|v| (v, fill(nominal))).collect(),
        }
    }

    #[test]
    fn nominal_ratio() {
        let dims = GridDims::new(1, 1).unwrap();
        // data eff 0.5, mc eff 0.4 -> SF 1.25
        let data = flat_maps(Sample::Data, dims, 0.5, 0.05, 0.01);
        let mc = flat_maps(Sample::Mc, dims, 0.4, 0.04, 0.01);
        let sf = compose_scale_factors(&data, &mc).unwrap();
        for bin in dims.bins() {
            assert_abs_diff_eq!(sf.nominal.get(bin), 1.25, epsilon = 1e-12);
            // err = 1.25 * (0.05/0.5 + 0.04/0.4) = 1.25 * 0.2 = 0.25
            assert_abs_diff_eq!(sf.stat_up.get(bin), 1.5, epsilon = 1e-12);
            assert_abs_diff_eq!(sf.stat_down.get(bin), 1.0, epsilon = 1e-12);
            // syst err = 1.25 * (0.01/0.5 + 0.01/0.4) = 1.25 * 0.045 = 0.05625
            assert_abs_diff_eq!(sf.syst_up.get(bin), 1.30625, epsilon = 1e-12);
            assert_abs_diff_eq!(sf.syst_down.get(bin), 1.19375, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_mc_nominal_zero_fills_the_bin() {
        let dims = GridDims::new(1, 1).unwrap();
        let data = flat_maps(Sample::Data, dims, 0.5, 0.05, 0.01);
        let mut mc = flat_maps(Sample::Mc, dims, 0.4, 0.04, 0.01);
        let bin = BinIndex { i: 1, j: 2 };
        mc.nominal.set(bin, 0.0);

        let sf = compose_scale_factors(&data, &mc).unwrap();
        assert_eq!(sf.nominal.get(bin), 0.0);
        assert_eq!(sf.stat_up.get(bin), 0.0);
        assert_eq!(sf.stat_down.get(bin), 0.0);
        assert_eq!(sf.syst_up.get(bin), 0.0);
        assert_eq!(sf.syst_down.get(bin), 0.0);
        // Other bins untouched.
        let other = BinIndex { i: 1, j: 1 };
        assert_abs_diff_eq!(sf.nominal.get(other), 1.25, epsilon = 1e-12);
    }

    #[test]
    fn zero_syst_half_width_zero_fills_syst_maps_only() {
        let dims = GridDims::new(1, 1).unwrap();
        let data = flat_maps(Sample::Data, dims, 0.5, 0.05, 0.0);
        let mc = flat_maps(Sample::Mc, dims, 0.4, 0.04, 0.01);
        let sf = compose_scale_factors(&data, &mc).unwrap();
        let bin = BinIndex { i: 1, j: 1 };
        assert_abs_diff_eq!(sf.nominal.get(bin), 1.25, epsilon = 1e-12);
        assert_eq!(sf.syst_up.get(bin), 0.0);
        assert_eq!(sf.syst_down.get(bin), 0.0);
        assert!(sf.stat_up.get(bin) > 1.25);
    }

    #[test]
    fn variation_maps_divide_element_wise() {
        let dims = GridDims::new(1, 1).unwrap();
        let mut data = flat_maps(Sample::Data, dims, 0.5, 0.05, 0.01);
        let mc = flat_maps(Sample::Mc, dims, 0.4, 0.04, 0.01);
        let bin = BinIndex { i: 2, j: 1 };
        data.variations.get_mut(&Variation::PtUp).unwrap().set(bin, 0.48);

        let sf = compose_scale_factors(&data, &mc).unwrap();
        assert_abs_diff_eq!(sf.variations[&Variation::PtUp].get(bin), 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(sf.iso_env.get(bin), 1.25, epsilon = 1e-12);
    }
}
