use crate::error::{CliError, Result};
use caspolcheck::core::numerics::tolerance::is_valid_reltol;
use std::path::Path;

pub mod asymptotic;
pub mod equivalence;
pub mod models;
pub mod regression;
pub mod suite;

fn checked_reltol(reltol: Option<f64>, default: f64) -> Result<f64> {
    let reltol = reltol.unwrap_or(default);
    if is_valid_reltol(reltol) {
        Ok(reltol)
    } else {
        Err(CliError::Argument(format!(
            "--reltol must be finite and positive, got {}",
            reltol
        )))
    }
}

fn parse_failure(path: &Path, source: impl Into<anyhow::Error>) -> CliError {
    CliError::FileParsing {
        path: path.to_path_buf(),
        source: source.into(),
    }
}
