//! Data-taking periods and their run-number ranges.
//!
//! Ranges come from the COMA period report, restricted to the 13 TeV
//! periods covered by the trigger recommendations (cosmic, 5 TeV,
//! heavy-ion, commissioning, and beam-splash periods are excluded,
//! as are periods the recommendations skip outright).

use mt_core::{Error, Result};

/// Years covered by the measurement.
pub const YEARS: [u16; 4] = [2015, 2016, 2017, 2018];

/// One data-taking period of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPeriod {
    /// Data-taking year.
    pub year: u16,
    /// Period letter (2016 period D is split at the menu change).
    pub name: &'static str,
    /// First run number of the period.
    pub first_run: u32,
    /// Last run number of the period.
    pub last_run: u32,
}

const fn p(year: u16, name: &'static str, first_run: u32, last_run: u32) -> DataPeriod {
    DataPeriod { year, name, first_run, last_run }
}

/// Every usable period, ordered by year then first run.
pub const PERIODS: &[DataPeriod] = &[
    // 2015: trigger recs cover D3-D6 only; the full D range is kept
    // and callers select runs themselves.
    p(2015, "D", 276073, 276954),
    p(2015, "E", 278727, 279928),
    p(2015, "F", 279932, 280422),
    p(2015, "G", 280423, 281075),
    p(2015, "H", 281130, 281411),
    p(2015, "J", 282625, 284484),
    // 2016: D is split where the single-muon menu changed.
    p(2016, "A", 296939, 300287),
    p(2016, "B", 300345, 300908),
    p(2016, "C", 301912, 302393),
    p(2016, "D1D3", 302737, 302872),
    p(2016, "D4D8", 302919, 303560),
    p(2016, "E", 303638, 303892),
    p(2016, "F", 303943, 304494),
    p(2016, "G", 305291, 306714),
    p(2016, "I", 307124, 308084),
    p(2016, "K", 309311, 309759),
    p(2016, "L", 310015, 311481),
    // 2017
    p(2017, "B", 325713, 328393),
    p(2017, "C", 329385, 330470),
    p(2017, "D", 330857, 332304),
    p(2017, "E", 332720, 334779),
    p(2017, "F", 334842, 335290),
    p(2017, "H", 336497, 336782),
    p(2017, "I", 336832, 337833),
    p(2017, "K", 338183, 340453),
    // 2018
    p(2018, "B", 348885, 349533),
    p(2018, "C", 349534, 350220),
    p(2018, "D", 350310, 352107),
    p(2018, "F", 352274, 352514),
    p(2018, "I", 355261, 355273),
    p(2018, "K", 355529, 356259),
    p(2018, "L", 357050, 359171),
    p(2018, "O", 361738, 363400),
    p(2018, "Q", 363664, 364292),
];

/// Periods of one year, in run order.
pub fn periods(year: u16) -> impl Iterator<Item = &'static DataPeriod> {
    PERIODS.iter().filter(move |p| p.year == year)
}

/// Look up a period by year and name.
pub fn find(year: u16, name: &str) -> Option<&'static DataPeriod> {
    PERIODS.iter().find(|p| p.year == year && p.name == name)
}

/// The period containing `run`, if any.
pub fn period_for_run(year: u16, run: u32) -> Option<&'static DataPeriod> {
    periods(year).find(|p| (p.first_run..=p.last_run).contains(&run))
}

/// Validate a (year, period) pair.
pub fn validate(year: u16, name: &str) -> Result<&'static DataPeriod> {
    if !YEARS.contains(&year) {
        return Err(Error::InvalidConfiguration(format!(
            "unknown year {year}; expected one of {YEARS:?}"
        )));
    }
    find(year, name).ok_or_else(|| {
        let known: Vec<&str> = periods(year).map(|p| p.name).collect();
        Error::InvalidConfiguration(format!(
            "unknown period '{name}' for {year}; expected one of {known:?}"
        ))
    })
}

/// MC campaign matched to a data-taking year (`16a`/`16d`/`16e`).
pub fn mc_campaign(year: u16) -> Result<&'static str> {
    match year {
        2015 | 2016 => Ok("16a"),
        2017 => Ok("16d"),
        2018 => Ok("16e"),
        _ => Err(Error::InvalidConfiguration(format!(
            "unknown year {year}; expected one of {YEARS:?}"
        ))),
    }
}
