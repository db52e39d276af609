use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative tolerance for comparisons against stored reference values.
pub const DEFAULT_RELTOL: f64 = 0.1;

/// Relative tolerance for comparisons against asymptotic theory or equivalent computations.
pub const VALIDATION_RELTOL: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Comparison {
    Pass,
    SignMismatch,
    ToleranceExceeded,
}

impl Comparison {
    #[inline]
    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::SignMismatch => write!(f, "different sign"),
            Self::ToleranceExceeded => write!(f, "values differ beyond allowed tolerance"),
        }
    }
}

/// `|ln(measured / reference)|`, or `None` when the quotient is not positive.
///
/// A NaN quotient yields `Some(NaN)`.
#[inline]
pub fn log_deviation(measured: f64, reference: f64) -> Option<f64> {
    let quotient = measured / reference;
    if quotient <= 0.0 {
        None
    } else {
        Some(quotient.ln().abs())
    }
}

/// Sign-aware relative comparison on a logarithmic scale.
///
/// Over- and underestimates by the same factor `1 + reltol` are treated alike, which suits
/// quantities spanning many orders of magnitude. The boundary itself passes; an undefined
/// quotient (`0/0`, NaN input) never does.
#[inline]
pub fn compare(measured: f64, reference: f64, reltol: f64) -> Comparison {
    match log_deviation(measured, reference) {
        None => Comparison::SignMismatch,
        Some(deviation) if deviation <= (1.0 + reltol).ln() => Comparison::Pass,
        Some(_) => Comparison::ToleranceExceeded,
    }
}

/// The two tolerance levels used throughout a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Tolerances {
    pub default: f64,
    pub validation: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            default: DEFAULT_RELTOL,
            validation: VALIDATION_RELTOL,
        }
    }
}

impl Tolerances {
    pub fn is_valid(&self) -> bool {
        is_valid_reltol(self.default) && is_valid_reltol(self.validation)
    }
}

#[inline]
pub fn is_valid_reltol(reltol: f64) -> bool {
    reltol.is_finite() && reltol > 0.0
}
