//! JSON count-table input.
//!
//! The input format is one JSON object per measurement:
//!
//! ```json
//! {
//!   "x_bins": 2,
//!   "y_bins": 3,
//!   "samples": {
//!     "data": { "nominal": { "matched": [[..]], "probes": [[..]] }, .. },
//!     "mc":   { "nominal": { "matched": [[..]], "probes": [[..]] }, .. }
//!   }
//! }
//! ```
//!
//! Rows are eta-major with the overflow slice last on both axes, so
//! every row list has `x_bins + 1` rows of `y_bins + 1` entries.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use mt_core::{CountGrid, Error, GridDims, Result, Sample, Variation};
use mt_engine::BinCountSource;

#[derive(Debug, Deserialize)]
struct RawCounts {
    matched: Vec<Vec<f64>>,
    probes: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    x_bins: usize,
    y_bins: usize,
    samples: HashMap<String, HashMap<String, RawCounts>>,
}

/// Count grids parsed from one input file.
#[derive(Debug)]
pub struct CountTable {
    dims: GridDims,
    grids: HashMap<(Sample, Variation), CountGrid>,
}

impl CountTable {
    /// Load a count table from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a count table from JSON text. Unknown sample or
    /// variation keys and ragged rows are rejected here; a *missing*
    /// variation is only reported when the engine asks for it.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawTable = serde_json::from_str(text)?;
        let dims = GridDims::new(raw.x_bins, raw.y_bins)?;

        let mut grids = HashMap::new();
        for (sample_name, variations) in &raw.samples {
            let sample = match sample_name.as_str() {
                "data" => Sample::Data,
                "mc" => Sample::Mc,
                other => {
                    return Err(Error::InvalidConfiguration(format!(
                        "unknown sample '{other}'; expected 'data' or 'mc'"
                    )))
                }
            };
            for (name, counts) in variations {
                let variation: Variation = name.parse()?;
                let grid = CountGrid::from_rows(dims, &counts.matched, &counts.probes)?;
                grids.insert((sample, variation), grid);
            }
        }
        Ok(Self { dims, grids })
    }
}

impl BinCountSource for CountTable {
    fn dims(&self) -> GridDims {
        self.dims
    }

    fn counts(&self, sample: Sample, variation: Variation) -> Result<&CountGrid> {
        self.grids.get(&(sample, variation)).ok_or_else(|| Error::MissingCountSource {
            sample: sample.name().to_string(),
            variation: variation.name().to_string(),
            expected: format!("samples.{}.{}", sample.name(), variation.name()),
        })
    }
}
