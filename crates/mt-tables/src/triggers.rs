//! Trigger menus per year, and per period where the menu changed
//! mid-year (2016).
//!
//! Single-muon analyses also use OR combinations of the single-muon
//! triggers; [`or_combinations`] derives them from the plain list.

use mt_core::{Error, Result};

/// Trigger lists for one (year, period) slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerMenu {
    /// Data-taking year.
    pub year: u16,
    /// Period this menu is specific to; `None` means the whole year.
    pub period: Option<&'static str>,
    /// Single-muon triggers (before OR combination).
    pub single: &'static [&'static str],
    /// Multi-leg triggers.
    pub multi: &'static [&'static str],
}

const MULTI_2016_EARLY_A: &[&str] = &[
    "HLT_2mu10",
    "HLT_2mu10_nomucomb",
    "HLT_mu20_mu8noL1",
    "HLT_mu20_2mu4noL1",
    "HLT_3mu4",
    "HLT_mu6_2mu4",
    "HLT_mu20_nomucomb_mu6noL1_nscan03",
    "HLT_mu11_nomucomb_2mu4noL1_nscan03_L1MU11_2MU6",
    "HLT_mu20_msonly_mu10noL1_msonly_nscan05_noComb",
    "HLT_mu11_nomucomb_2mu4noL1_nscan03_L1MU11_2MU6_bTau",
    "HLT_mu11_nomucomb_mu6noL1_nscan03_L1MU11_2MU6_bTau",
    "HLT_mu6_nomucomb_2mu4_nomucomb_bTau_L1MU6_3MU4",
    "HLT_2mu6_nomucomb_mu4_nomucomb_bTau_L12MU6_3MU4",
];

const MULTI_2016_EARLY_BCD: &[&str] = &[
    "HLT_2mu14",
    "HLT_2mu14_nomucomb",
    "HLT_mu20_mu8noL1",
    "HLT_mu20_2mu4noL1",
    "HLT_3mu6",
    "HLT_mu6_2mu4",
    "HLT_mu20_nomucomb_mu6noL1_nscan03",
    "HLT_mu11_nomucomb_2mu4noL1_nscan03_L1MU11_2MU6",
    "HLT_mu20_msonly_mu10noL1_msonly_nscan05_noComb",
    "HLT_mu11_nomucomb_2mu4noL1_nscan03_L1MU11_2MU6_bTau",
    "HLT_mu11_nomucomb_mu6noL1_nscan03_L1MU11_2MU6_bTau",
    "HLT_mu6_nomucomb_2mu4_nomucomb_bTau_L1MU6_3MU4",
    "HLT_2mu6_nomucomb_mu4_nomucomb_bTau_L12MU6_3MU4",
];

const SINGLE_2016_BCD: &[&str] = &["HLT_mu24_ivarmedium", "HLT_mu24_imedium", "HLT_mu50"];

const SINGLE_2016_MID: &[&str] = &["HLT_mu24_ivarmedium", "HLT_mu26_ivarmedium", "HLT_mu50"];
const MULTI_2016_MID: &[&str] = &[
    "HLT_2mu14",
    "HLT_mu20_mu8noL1",
    "HLT_mu22_mu8noL1",
    "HLT_mu20_2mu4noL1",
    "HLT_3mu6_msonly",
];

const SINGLE_2016_LATE: &[&str] = &["HLT_mu26_ivarmedium", "HLT_mu50"];
const MULTI_2016_LATE: &[&str] =
    &["HLT_2mu14", "HLT_mu22_mu8noL1", "HLT_mu20_2mu4noL1", "HLT_3mu6_msonly"];

/// Every menu slice, ordered by year then period.
pub const MENUS: &[TriggerMenu] = &[
    TriggerMenu {
        year: 2015,
        period: None,
        single: &["HLT_mu20_iloose_L1MU15", "HLT_mu40", "HLT_mu60_0eta105_msonly"],
        multi: &["HLT_2mu10", "HLT_3mu6", "HLT_3mu6_msonly", "HLT_mu18_2mu4noL1", "HLT_mu18_mu8noL1"],
    },
    TriggerMenu {
        year: 2016,
        period: Some("A"),
        single: &["HLT_mu24_iloose", "HLT_mu24_ivarloose", "HLT_mu40", "HLT_mu50"],
        multi: MULTI_2016_EARLY_A,
    },
    TriggerMenu { year: 2016, period: Some("B"), single: SINGLE_2016_BCD, multi: MULTI_2016_EARLY_BCD },
    TriggerMenu { year: 2016, period: Some("C"), single: SINGLE_2016_BCD, multi: MULTI_2016_EARLY_BCD },
    TriggerMenu {
        year: 2016,
        period: Some("D1D3"),
        single: SINGLE_2016_BCD,
        multi: MULTI_2016_EARLY_BCD,
    },
    TriggerMenu { year: 2016, period: Some("D4D8"), single: SINGLE_2016_MID, multi: MULTI_2016_MID },
    TriggerMenu { year: 2016, period: Some("E"), single: SINGLE_2016_MID, multi: MULTI_2016_MID },
    TriggerMenu { year: 2016, period: Some("F"), single: SINGLE_2016_LATE, multi: MULTI_2016_LATE },
    TriggerMenu { year: 2016, period: Some("G"), single: SINGLE_2016_LATE, multi: MULTI_2016_LATE },
    TriggerMenu { year: 2016, period: Some("I"), single: SINGLE_2016_LATE, multi: MULTI_2016_LATE },
    TriggerMenu { year: 2016, period: Some("K"), single: SINGLE_2016_LATE, multi: MULTI_2016_LATE },
    TriggerMenu { year: 2016, period: Some("L"), single: SINGLE_2016_LATE, multi: MULTI_2016_LATE },
    TriggerMenu {
        year: 2017,
        period: None,
        single: &["HLT_mu26_ivarmedium", "HLT_mu50", "HLT_mu60_0eta105_msonly"],
        multi: &[
            "HLT_2mu14",
            "HLT_mu22_mu8noL1",
            "HLT_mu22_mu8noL1_calotag_0eta010",
            "HLT_mu20_2mu4noL1",
            "HLT_3mu6",
            "HLT_3mu6_msonly",
            "HLT_4mu4",
        ],
    },
    TriggerMenu {
        year: 2018,
        period: None,
        single: &["HLT_mu26_ivarmedium", "HLT_mu50", "HLT_mu60_0eta105_msonly"],
        multi: &["HLT_2mu14", "HLT_mu22_mu8noL1", "HLT_mu20_2mu4noL1", "HLT_3mu6"],
    },
];

/// The menu applying to a (year, period): the period-specific slice
/// when one exists, otherwise the whole-year one.
pub fn menu(year: u16, period: &str) -> Result<&'static TriggerMenu> {
    MENUS
        .iter()
        .find(|m| m.year == year && m.period == Some(period))
        .or_else(|| MENUS.iter().find(|m| m.year == year && m.period.is_none()))
        .ok_or_else(|| {
            Error::InvalidConfiguration(format!("no trigger menu for {year} period {period}"))
        })
}

/// Threshold pT of a single-muon trigger, parsed from the `muX` leg.
pub fn leading_pt(trigger: &str) -> Result<u32> {
    trigger
        .split('_')
        .nth(1)
        .and_then(|leg| leg.strip_prefix("mu"))
        .and_then(|pt| pt.parse().ok())
        .ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "cannot parse muon pT from trigger name '{trigger}'"
            ))
        })
}

/// OR combinations of single-muon triggers: all unique pairings with
/// the lower-pT trigger first.
///
/// Only meaningful for single-muon triggers; multi-leg names do not
/// follow the `HLT_muX_...` pattern this relies on.
pub fn or_combinations(triggers: &[&str]) -> Result<Vec<String>> {
    let mut by_pt: Vec<&str> = triggers.to_vec();
    let pts: Result<Vec<u32>> = triggers.iter().map(|t| leading_pt(t)).collect();
    pts?;
    by_pt.sort_by_key(|t| leading_pt(t).unwrap_or(u32::MAX));

    let mut combined = Vec::new();
    for (n, low) in by_pt.iter().enumerate() {
        for high in &by_pt[n + 1..] {
            combined.push(format!("{low}_OR_{high}"));
        }
    }
    Ok(combined)
}

/// Whether `trigger` belongs to the (year, period) menu, either as a
/// plain single/multi trigger or as a single-muon OR combination.
pub fn validate_trigger(year: u16, period: &str, trigger: &str) -> Result<()> {
    let menu = menu(year, period)?;
    if menu.single.contains(&trigger) || menu.multi.contains(&trigger) {
        return Ok(());
    }
    if trigger.contains("_OR_") && or_combinations(menu.single)?.iter().any(|t| t == trigger) {
        return Ok(());
    }
    Err(Error::InvalidConfiguration(format!(
        "trigger '{trigger}' is not in the {year} period {period} menu"
    )))
}
