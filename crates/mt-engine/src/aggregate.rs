//! Per-sample assembly of efficiency maps and uncertainty envelopes.
//!
//! For one sample the aggregator produces the nominal map, the
//! statistical up/down maps, the raw map of every non-nominal
//! variation, the isolation-envelope map, and the systematic up/down
//! maps built from the envelope plus the quadrature sum of the
//! remaining variations.
//!
//! Each bin depends only on its own counts, so the per-bin loop is
//! data-parallel; results are assembled in bin order afterwards.

use std::collections::BTreeMap;

use rayon::prelude::*;

use mt_core::{
    BinIndex, CountGrid, EfficiencyValue, Error, GridDims, Map2D, Result, Sample, Variation,
};

use crate::{estimator, BinCountSource};

/// The family of maps produced for one sample.
#[derive(Debug, Clone)]
pub struct SampleMaps {
    /// Sample these maps belong to.
    pub sample: Sample,
    /// Nominal efficiency per bin.
    pub nominal: Map2D,
    /// `nominal + statistical error up` per bin.
    pub stat_up: Map2D,
    /// `nominal - statistical error down` per bin.
    pub stat_down: Map2D,
    /// `nominal + total systematic` per bin.
    pub syst_up: Map2D,
    /// `nominal - total systematic` per bin.
    pub syst_down: Map2D,
    /// Raw efficiency of the isolation variant picked per bin.
    pub iso_env: Map2D,
    /// Raw efficiency per non-nominal variation.
    pub variations: BTreeMap<Variation, Map2D>,
}

/// Resolve every catalogue grid up front so that a missing variation
/// aborts before any bin is computed, and verify the shared binning.
pub(crate) fn resolve_catalogue<'a>(
    source: &'a dyn BinCountSource,
    sample: Sample,
) -> Result<BTreeMap<Variation, &'a CountGrid>> {
    let dims = source.dims();
    let mut grids = BTreeMap::new();
    for variation in Variation::ALL {
        let grid = source.counts(sample, variation)?;
        if grid.dims() != dims {
            return Err(Error::GridMismatch(format!(
                "{sample} '{variation}' grid is {:?}, expected {dims:?}",
                grid.dims()
            )));
        }
        grids.insert(variation, grid);
    }
    Ok(grids)
}

/// Point efficiency of one bin; empty bins carry no measurement and
/// read as 0 in the output maps.
pub(crate) fn point_eff(grid: &CountGrid, bin: BinIndex) -> f64 {
    estimator::efficiency(grid.pair(bin)).map_or(0.0, |e| e.point)
}

/// Envelope tie-break, kept in one place: the first variant wins
/// only on a strictly larger absolute deviation from nominal; an
/// exact tie goes to the catalogue-second variant.
pub(crate) fn envelope_picks_first(nominal: f64, eff_first: f64, eff_second: f64) -> bool {
    (nominal - eff_first).abs() > (nominal - eff_second).abs()
}

/// Pick the isolation envelope for one bin. Returns the winner's raw
/// efficiency and its (signed) deviation from nominal.
pub(crate) fn isolation_envelope(nominal: f64, eff_first: f64, eff_second: f64) -> (f64, f64) {
    if envelope_picks_first(nominal, eff_first, eff_second) {
        (eff_first, nominal - eff_first)
    } else {
        (eff_second, nominal - eff_second)
    }
}

struct BinCell {
    bin: BinIndex,
    nominal: EfficiencyValue,
    iso_env: f64,
    syst_total: f64,
    /// Raw efficiencies in `Variation::non_nominal()` order.
    raw: Vec<f64>,
}

fn bin_cell(grids: &BTreeMap<Variation, &CountGrid>, bin: BinIndex) -> BinCell {
    let nominal =
        estimator::efficiency(grids[&Variation::Nominal].pair(bin)).unwrap_or(EfficiencyValue::ZERO);
    let nom = nominal.point;

    let (first, second) = Variation::ISOLATION_PAIR;
    let (iso_env, iso_dev) =
        isolation_envelope(nom, point_eff(grids[&first], bin), point_eff(grids[&second], bin));
    let mut syst_sq = iso_dev * iso_dev;

    let mut raw = Vec::with_capacity(Variation::ALL.len() - 1);
    for variation in Variation::non_nominal() {
        let eff = point_eff(grids[&variation], bin);
        raw.push(eff);
        if !variation.is_isolation() {
            let dev = nom - eff;
            syst_sq += dev * dev;
        }
    }

    BinCell { bin, nominal, iso_env, syst_total: syst_sq.sqrt(), raw }
}

/// Build the full map family for one sample.
///
/// A variation whose count grid cannot be located is fatal; the run
/// aborts before any map is filled.
pub fn aggregate_sample(source: &dyn BinCountSource, sample: Sample) -> Result<SampleMaps> {
    let dims = source.dims();
    let grids = resolve_catalogue(source, sample)?;
    tracing::debug!(%sample, cells = dims.n_cells(), "aggregating variation maps");

    let bins: Vec<BinIndex> = dims.bins().collect();
    let cells: Vec<BinCell> = bins.par_iter().map(|&bin| bin_cell(&grids, bin)).collect();

    let mut maps = SampleMaps {
        sample,
        nominal: Map2D::zeros(dims),
        stat_up: Map2D::zeros(dims),
        stat_down: Map2D::zeros(dims),
        syst_up: Map2D::zeros(dims),
        syst_down: Map2D::zeros(dims),
        iso_env: Map2D::zeros(dims),
        variations: Variation::non_nominal().map(|v| (v, Map2D::zeros(dims))).collect(),
    };

    for cell in cells {
        maps.nominal.set(cell.bin, cell.nominal.point);
        maps.stat_up.set(cell.bin, cell.nominal.up());
        maps.stat_down.set(cell.bin, cell.nominal.down());
        maps.syst_up.set(cell.bin, cell.nominal.point + cell.syst_total);
        maps.syst_down.set(cell.bin, cell.nominal.point - cell.syst_total);
        maps.iso_env.set(cell.bin, cell.iso_env);
        for (variation, eff) in Variation::non_nominal().zip(cell.raw) {
            maps.variations
                .get_mut(&variation)
                .expect("map family covers the catalogue")
                .set(cell.bin, eff);
        }
    }

    Ok(maps)
}
