//! Grid, count, and efficiency data model.
//!
//! All grids are eta x phi with 1-based bin coordinates. Each axis
//! carries one extra overflow slice (`i == x_bins + 1`,
//! `j == y_bins + 1`) that participates in every map and every sum:
//! omitting it would silently drop events outside the nominal axis
//! range.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which sample a count grid belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sample {
    /// Recorded collision data.
    Data,
    /// Simulation.
    Mc,
}

impl Sample {
    /// Both samples, data first.
    pub const ALL: [Sample; 2] = [Sample::Data, Sample::Mc];

    /// Lowercase wire name (`data` / `mc`).
    pub fn name(self) -> &'static str {
        match self {
            Sample::Data => "data",
            Sample::Mc => "mc",
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// eta x phi binning. `x_bins`/`y_bins` count the regular bins;
/// every grid carries one extra overflow slice per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    /// Number of regular eta bins.
    pub x_bins: usize,
    /// Number of regular phi bins.
    pub y_bins: usize,
}

impl GridDims {
    /// Create a binning. Both axes must have at least one regular bin.
    pub fn new(x_bins: usize, y_bins: usize) -> Result<Self> {
        if x_bins == 0 || y_bins == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "grid must have at least one bin per axis, got {x_bins}x{y_bins}"
            )));
        }
        Ok(Self { x_bins, y_bins })
    }

    /// Total number of cells, overflow slices included.
    pub fn n_cells(self) -> usize {
        (self.x_bins + 1) * (self.y_bins + 1)
    }

    /// Whether `bin` addresses a cell of this grid.
    pub fn contains(self, bin: BinIndex) -> bool {
        (1..=self.x_bins + 1).contains(&bin.i) && (1..=self.y_bins + 1).contains(&bin.j)
    }

    /// Dense storage offset for `bin`.
    ///
    /// Callers must pass an in-range index; this is checked in debug
    /// builds only.
    pub fn offset(self, bin: BinIndex) -> usize {
        debug_assert!(self.contains(bin), "bin {bin} out of range for {self:?}");
        (bin.i - 1) * (self.y_bins + 1) + (bin.j - 1)
    }

    /// Iterate every bin, overflow slices included, row-major.
    pub fn bins(self) -> impl Iterator<Item = BinIndex> {
        let (nx, ny) = (self.x_bins + 1, self.y_bins + 1);
        (1..=nx).flat_map(move |i| (1..=ny).map(move |j| BinIndex { i, j }))
    }
}

/// 1-based bin coordinates; the `x_bins + 1` / `y_bins + 1` slice is
/// the overflow slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinIndex {
    /// eta bin, `1 ..= x_bins + 1`.
    pub i: usize,
    /// phi bin, `1 ..= y_bins + 1`.
    pub j: usize,
}

impl fmt::Display for BinIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// `(matched, probes)` counts for one bin or one whole-grid
/// aggregate. Weighted histogram fills make these `f64`.
///
/// `matched <= probes` is expected but not enforced: a violation is
/// a data-quality problem upstream, not an engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountPair {
    /// Probes associated with a firing trigger.
    pub matched: f64,
    /// All candidate probes.
    pub probes: f64,
}

impl CountPair {
    /// The empty pair.
    pub const ZERO: CountPair = CountPair { matched: 0.0, probes: 0.0 };

    /// Accumulate another pair into this one.
    pub fn add(&mut self, other: CountPair) {
        self.matched += other.matched;
        self.probes += other.probes;
    }
}

/// Point efficiency with asymmetric statistical errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyValue {
    /// Point estimate, `matched / probes`.
    pub point: f64,
    /// Upper statistical error (distance to the upper interval bound).
    pub err_up: f64,
    /// Lower statistical error (distance to the lower interval bound).
    pub err_low: f64,
}

impl EfficiencyValue {
    /// All-zero value, used when a bin carries no measurement.
    pub const ZERO: EfficiencyValue = EfficiencyValue { point: 0.0, err_up: 0.0, err_low: 0.0 };

    /// `point + err_up`.
    pub fn up(&self) -> f64 {
        self.point + self.err_up
    }

    /// `point - err_low`.
    pub fn down(&self) -> f64 {
        self.point - self.err_low
    }
}

/// Dense bin -> value map over one grid, overflow slices included.
///
/// Created empty, filled once during the single pass over bins, and
/// read-only afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct Map2D {
    dims: GridDims,
    values: Vec<f64>,
}

impl Map2D {
    /// All-zero map over `dims`.
    pub fn zeros(dims: GridDims) -> Self {
        Self { dims, values: vec![0.0; dims.n_cells()] }
    }

    /// The binning of this map.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Value at `bin`.
    pub fn get(&self, bin: BinIndex) -> f64 {
        self.values[self.dims.offset(bin)]
    }

    /// Set the value at `bin`.
    pub fn set(&mut self, bin: BinIndex, value: f64) {
        let at = self.dims.offset(bin);
        self.values[at] = value;
    }

    /// Rows (one per eta bin, overflow last), each with one entry per
    /// phi bin, overflow last. This is the JSON wire layout.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.dims.y_bins + 1).map(<[f64]>::to_vec).collect()
    }

    /// Rebuild a map from its wire layout.
    pub fn from_rows(dims: GridDims, rows: &[Vec<f64>]) -> Result<Self> {
        let mut map = Map2D::zeros(dims);
        check_rows(dims, rows)?;
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                map.set(BinIndex { i: i + 1, j: j + 1 }, v);
            }
        }
        Ok(map)
    }
}

/// Per-bin `(matched, probes)` grids for one (sample, variation).
#[derive(Debug, Clone, PartialEq)]
pub struct CountGrid {
    dims: GridDims,
    matched: Vec<f64>,
    probes: Vec<f64>,
}

impl CountGrid {
    /// Empty grid over `dims`.
    pub fn new(dims: GridDims) -> Self {
        let cells = dims.n_cells();
        Self { dims, matched: vec![0.0; cells], probes: vec![0.0; cells] }
    }

    /// Build a grid from wire-layout rows (see [`Map2D::to_rows`]).
    pub fn from_rows(dims: GridDims, matched: &[Vec<f64>], probes: &[Vec<f64>]) -> Result<Self> {
        check_rows(dims, matched)?;
        check_rows(dims, probes)?;
        let mut grid = CountGrid::new(dims);
        for bin in dims.bins() {
            grid.set(
                bin,
                CountPair { matched: matched[bin.i - 1][bin.j - 1], probes: probes[bin.i - 1][bin.j - 1] },
            );
        }
        Ok(grid)
    }

    /// The binning of this grid.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Counts at `bin`.
    pub fn pair(&self, bin: BinIndex) -> CountPair {
        let at = self.dims.offset(bin);
        CountPair { matched: self.matched[at], probes: self.probes[at] }
    }

    /// Set the counts at `bin`.
    pub fn set(&mut self, bin: BinIndex, pair: CountPair) {
        let at = self.dims.offset(bin);
        self.matched[at] = pair.matched;
        self.probes[at] = pair.probes;
    }

    /// Whole-grid aggregate counts, overflow slices included.
    pub fn totals(&self) -> CountPair {
        CountPair { matched: self.matched.iter().sum(), probes: self.probes.iter().sum() }
    }
}

fn check_rows(dims: GridDims, rows: &[Vec<f64>]) -> Result<()> {
    if rows.len() != dims.x_bins + 1 {
        return Err(Error::GridMismatch(format!(
            "expected {} rows (overflow included), got {}",
            dims.x_bins + 1,
            rows.len()
        )));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != dims.y_bins + 1 {
            return Err(Error::GridMismatch(format!(
                "row {} has {} entries, expected {} (overflow included)",
                i + 1,
                row.len(),
                dims.y_bins + 1
            )));
        }
    }
    Ok(())
}
