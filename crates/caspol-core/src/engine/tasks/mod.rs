//! The three kinds of check a scenario can run.
//!
//! - [`regime`] - averaged table against short- and long-range asymptotes
//! - [`regression`] - per-frequency table against registered exact values
//! - [`equivalence`] - equivalent per-frequency tables against each other

use crate::core::models::dataset::Dataset;
use crate::core::models::row::{AveragedRow, RowShape, SpectralRow};
use crate::engine::error::EngineError;

pub mod equivalence;
pub mod regime;
pub mod regression;

pub fn averaged_rows(dataset: &Dataset) -> Result<&[AveragedRow], EngineError> {
    dataset.as_averaged().ok_or(EngineError::ShapeMismatch {
        expected: RowShape::Averaged,
        found: dataset.shape(),
    })
}

pub fn spectral_rows(dataset: &Dataset) -> Result<&[SpectralRow], EngineError> {
    dataset.as_spectral().ok_or(EngineError::ShapeMismatch {
        expected: RowShape::Spectral,
        found: dataset.shape(),
    })
}
