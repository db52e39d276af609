use super::config::ConfigError;
use crate::core::asymptotics::model::ModelError;
use crate::core::io::table::TableError;
use crate::core::models::row::RowShape;
use crate::core::reference::table::ReferenceError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read output table '{path}': {source}", path = path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error(
        "Unregistered reference: no value for geometry '{geometry}' at xi = {frequency:e}, z = {distance:e} (line {line})"
    )]
    UnregisteredReference {
        geometry: String,
        frequency: f64,
        distance: f64,
        line: usize,
    },

    #[error("Reference table error: {source}")]
    Reference {
        #[from]
        source: ReferenceError,
    },

    #[error("Invalid asymptotic model: {source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("External computation failed for `{command}`: {reason}")]
    ExternalComputationFailed { command: String, reason: String },

    #[error(
        "Row at xi = {frequency:e}, z = {distance:e} of '{present_in}' has no counterpart in '{missing_from}'"
    )]
    UnpairedRow {
        present_in: String,
        missing_from: String,
        frequency: f64,
        distance: f64,
    },

    #[error(
        "Rows at xi = {frequency:e}, z = {distance:e} of '{label}' are ambiguous (line {line} repeats an earlier one)"
    )]
    DuplicateRow {
        label: String,
        frequency: f64,
        distance: f64,
        line: usize,
    },

    #[error("Expected a {expected} dataset, found a {found} one")]
    ShapeMismatch { expected: RowShape, found: RowShape },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
