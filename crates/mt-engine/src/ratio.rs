//! Division with an explicit zero-denominator policy.
//!
//! Historical versions of this computation handled divide-by-zero
//! differently at every call site (zero-fill here, abort there, a
//! `-1` sentinel elsewhere). Every call site now states its policy.

use mt_core::{Error, Result};

/// What a call site does when the denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZeroDenominator {
    /// The result is defined to be 0 (explicit zero-fill, not
    /// "missing").
    ZeroFill,
    /// Report a fixed sentinel value.
    Sentinel(f64),
    /// The request cannot continue.
    Fail,
}

/// `numerator / denominator` under the given policy. `what` names
/// the quantity for the error message in the `Fail` case.
pub fn ratio(numerator: f64, denominator: f64, policy: ZeroDenominator, what: &str) -> Result<f64> {
    if denominator == 0.0 {
        return match policy {
            ZeroDenominator::ZeroFill => Ok(0.0),
            ZeroDenominator::Sentinel(v) => Ok(v),
            ZeroDenominator::Fail => Err(Error::DegenerateRatio(what.to_string())),
        };
    }
    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_division() {
        assert_eq!(ratio(3.0, 4.0, ZeroDenominator::Fail, "x").unwrap(), 0.75);
    }

    #[test]
    fn zero_denominator_policies() {
        assert_eq!(ratio(1.0, 0.0, ZeroDenominator::ZeroFill, "x").unwrap(), 0.0);
        assert_eq!(ratio(1.0, 0.0, ZeroDenominator::Sentinel(-1.0), "x").unwrap(), -1.0);
        let err = ratio(1.0, 0.0, ZeroDenominator::Fail, "mc efficiency").unwrap_err();
        assert!(err.to_string().contains("mc efficiency"));
    }
}
