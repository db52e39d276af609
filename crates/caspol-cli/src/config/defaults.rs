use caspolcheck::core::numerics::tolerance::{DEFAULT_RELTOL, VALIDATION_RELTOL};
use caspolcheck::engine::external::{DEFAULT_ATOM, DEFAULT_PROGRAM};

pub struct DefaultsConfig {
    pub program: String,
    pub atom: String,
    pub default_reltol: f64,
    pub validation_reltol: f64,
    pub builtin_references: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            atom: DEFAULT_ATOM.to_string(),
            default_reltol: DEFAULT_RELTOL,
            validation_reltol: VALIDATION_RELTOL,
            builtin_references: true,
        }
    }
}
