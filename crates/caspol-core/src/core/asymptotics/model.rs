use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Short-range threshold ({short}) must be below the long-range threshold ({long})")]
    ThresholdOrder { short: f64, long: f64 },
    #[error("Parameter '{name}' must be finite and positive (value: {value})")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Which asymptotic law, if any, applies at a given separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Regime {
    ShortRange,
    LongRange,
    Crossover,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortRange => write!(f, "short-range"),
            Self::LongRange => write!(f, "long-range"),
            Self::Crossover => write!(f, "crossover"),
        }
    }
}

/// Raw, unchecked parameters as they appear in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ModelParams {
    pub short_threshold: f64,
    pub long_threshold: f64,
    pub c_sr: f64,
    pub c_lr: f64,
}

/// Closed-form Casimir-Polder asymptotics for one scenario.
///
/// Short range (non-retarded): `U(z) = -C_SR / z^3`.
/// Long range (retarded):      `U(z) = -C_LR / z^4`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelParams", into = "ModelParams")]
pub struct AsymptoticModel {
    params: ModelParams,
}

impl AsymptoticModel {
    pub fn new(params: ModelParams) -> Result<Self, ModelError> {
        for (name, value) in [
            ("short-threshold", params.short_threshold),
            ("long-threshold", params.long_threshold),
            ("c-sr", params.c_sr),
            ("c-lr", params.c_lr),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::InvalidParameter { name, value });
            }
        }
        if params.short_threshold >= params.long_threshold {
            return Err(ModelError::ThresholdOrder {
                short: params.short_threshold,
                long: params.long_threshold,
            });
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn short_threshold(&self) -> f64 {
        self.params.short_threshold
    }

    pub fn long_threshold(&self) -> f64 {
        self.params.long_threshold
    }

    #[inline]
    pub fn short_range(&self, z: f64) -> f64 {
        -self.params.c_sr / z.powi(3)
    }

    #[inline]
    pub fn long_range(&self, z: f64) -> f64 {
        -self.params.c_lr / z.powi(4)
    }

    #[inline]
    pub fn regime(&self, z: f64) -> Regime {
        if z <= self.params.short_threshold {
            Regime::ShortRange
        } else if z >= self.params.long_threshold {
            Regime::LongRange
        } else {
            Regime::Crossover
        }
    }

    /// The asymptotic prediction at `z`, or `None` inside the crossover zone.
    pub fn expected(&self, z: f64) -> Option<(Regime, f64)> {
        match self.regime(z) {
            Regime::ShortRange => Some((Regime::ShortRange, self.short_range(z))),
            Regime::LongRange => Some((Regime::LongRange, self.long_range(z))),
            Regime::Crossover => None,
        }
    }
}

impl TryFrom<ModelParams> for AsymptoticModel {
    type Error = ModelError;

    fn try_from(params: ModelParams) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}

impl From<AsymptoticModel> for ModelParams {
    fn from(model: AsymptoticModel) -> Self {
        model.params
    }
}
