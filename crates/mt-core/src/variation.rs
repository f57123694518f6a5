//! The closed catalogue of systematic variations.
//!
//! The catalogue is fixed at compile time so the compiler enforces
//! completeness wherever the variations are enumerated; no run-time
//! string matching on variation names decides engine behavior.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// One named systematic/statistical configuration of the
/// tag-and-probe selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variation {
    /// Baseline selection.
    Nominal,
    /// Tight isolation working point (first envelope variant).
    IsoTight,
    /// Tight track-only isolation (second envelope variant).
    IsoTightTrackOnly,
    /// Narrowed dilepton mass window.
    MllWindow,
    /// Delta-phi(ll) separation cut.
    DphillCut,
    /// Probe momentum scaled up.
    PtUp,
    /// Probe momentum scaled down.
    PtDown,
    /// Impact-parameter cuts removed.
    NoIp,
    /// Positive-charge probes only.
    MuPos,
    /// Negative-charge probes only.
    MuNeg,
    /// High pile-up selection.
    NvtxUp,
    /// Low pile-up selection.
    NvtxDown,
}

impl Variation {
    /// Every catalogue entry, in catalogue order.
    pub const ALL: [Variation; 12] = [
        Variation::Nominal,
        Variation::IsoTight,
        Variation::IsoTightTrackOnly,
        Variation::MllWindow,
        Variation::DphillCut,
        Variation::PtUp,
        Variation::PtDown,
        Variation::NoIp,
        Variation::MuPos,
        Variation::MuNeg,
        Variation::NvtxUp,
        Variation::NvtxDown,
    ];

    /// The two correlated isolation variants forming the envelope,
    /// in catalogue order. On an exact tie in per-bin deviation from
    /// nominal, the second entry wins.
    pub const ISOLATION_PAIR: (Variation, Variation) =
        (Variation::IsoTight, Variation::IsoTightTrackOnly);

    /// Stable wire name, matching the historical input file tokens.
    pub fn name(self) -> &'static str {
        match self {
            Variation::Nominal => "nominal",
            Variation::IsoTight => "isoTight",
            Variation::IsoTightTrackOnly => "isoTightTrackOnly",
            Variation::MllWindow => "mll",
            Variation::DphillCut => "dphill",
            Variation::PtUp => "ptup",
            Variation::PtDown => "ptdw",
            Variation::NoIp => "noIP",
            Variation::MuPos => "mupos",
            Variation::MuNeg => "muneg",
            Variation::NvtxUp => "nvtx_up",
            Variation::NvtxDown => "nvtx_dw",
        }
    }

    /// Whether this is one of the two isolation envelope variants.
    /// Resolved here once, at catalogue definition, never re-derived
    /// from name text.
    pub fn is_isolation(self) -> bool {
        matches!(self, Variation::IsoTight | Variation::IsoTightTrackOnly)
    }

    /// Every non-nominal variation, in catalogue order.
    pub fn non_nominal() -> impl Iterator<Item = Variation> {
        Variation::ALL.into_iter().filter(|v| *v != Variation::Nominal)
    }

    /// Variations entering the quadrature sum directly: non-nominal
    /// and non-isolation (the isolation pair is covered by the
    /// envelope instead).
    pub fn quadrature_members() -> impl Iterator<Item = Variation> {
        Variation::non_nominal().filter(|v| !v.is_isolation())
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Variation::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| Error::InvalidConfiguration(format!("unknown variation '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_closed_and_unique() {
        let mut names: Vec<&str> = Variation::ALL.iter().map(|v| v.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Variation::ALL.len());
    }

    #[test]
    fn wire_names_round_trip() {
        for v in Variation::ALL {
            assert_eq!(v.name().parse::<Variation>().unwrap(), v);
        }
        assert!("isotight".parse::<Variation>().is_err());
    }

    #[test]
    fn quadrature_members_exclude_nominal_and_isolation() {
        let members: Vec<Variation> = Variation::quadrature_members().collect();
        assert_eq!(members.len(), 9);
        assert!(!members.contains(&Variation::Nominal));
        assert!(!members.contains(&Variation::IsoTight));
        assert!(!members.contains(&Variation::IsoTightTrackOnly));
    }

    #[test]
    fn isolation_pair_is_tagged() {
        let (a, b) = Variation::ISOLATION_PAIR;
        assert!(a.is_isolation());
        assert!(b.is_isolation());
        assert_eq!(Variation::ALL.iter().filter(|v| v.is_isolation()).count(), 2);
    }
}
