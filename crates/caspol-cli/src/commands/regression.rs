use super::{checked_reltol, parse_failure};
use crate::cli::RegressionArgs;
use crate::error::{CliError, Result};
use crate::report;
use caspolcheck::core::io::output::{OutputKind, read_dataset};
use caspolcheck::core::numerics::tolerance::DEFAULT_RELTOL;
use caspolcheck::core::reference::table::ReferenceTable;
use caspolcheck::engine::config::FrequencySelection;
use caspolcheck::engine::error::EngineError;
use caspolcheck::engine::tasks::{regression, spectral_rows};
use std::path::PathBuf;
use tracing::info;

pub fn run(args: RegressionArgs) -> Result<bool> {
    let reltol = checked_reltol(args.reltol, DEFAULT_RELTOL)?;
    let table = load_references(&args.references)?;
    if !table.contains_geometry(&args.geometry) {
        return Err(CliError::Argument(format!(
            "No reference values are registered for geometry '{}'. See `caspol-check models`.",
            args.geometry
        )));
    }

    info!("Loading per-frequency table from {:?}", &args.input);
    let dataset =
        read_dataset(&args.input, OutputKind::ByXi).map_err(|e| parse_failure(&args.input, e))?;
    let rows = spectral_rows(&dataset)?;

    let selection = if args.frequencies.is_empty() {
        FrequencySelection::All
    } else {
        FrequencySelection::Only(args.frequencies.clone())
    };
    let report =
        regression::check_references(rows, &table, &args.geometry, &selection, reltol)?;

    let title = format!("{} against '{}'", args.input.display(), args.geometry);
    report::print_check(&title, &report)?;
    Ok(report.passed())
}

fn load_references(extra: &[PathBuf]) -> Result<ReferenceTable> {
    let mut table = ReferenceTable::builtin();
    for path in extra {
        info!("Loading reference values from {:?}", path);
        let loaded = ReferenceTable::load_csv(path).map_err(|e| parse_failure(path, e))?;
        table.merge(&loaded).map_err(EngineError::from)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn extra_references_are_merged_with_builtin_ones() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("extra.csv");
        fs::write(
            &csv,
            "geometry,frequency,distance,polarizability,potential\nsphere_pec,6.0,1.0,207.4813,-1.0e-9\n",
        )
        .unwrap();

        let table = load_references(&[csv]).unwrap();
        assert!(table.contains_geometry("sphere_pec"));
        assert!(table.contains_geometry("tetrahedron_pec_6"));
    }

    #[test]
    fn conflicting_reference_is_an_engine_error() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("conflict.csv");
        fs::write(
            &csv,
            "geometry,frequency,distance,polarizability,potential\ntetrahedron_pec_6,6.0,0.1,207.4813,-0.2\n",
        )
        .unwrap();

        assert!(matches!(
            load_references(&[csv]),
            Err(CliError::Engine(EngineError::Reference { .. }))
        ));
    }

    #[test]
    fn unregistered_row_fails_the_command() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("tetrahedron_pec_6.byXi");
        fs::write(&input, "0 0 0.5 6.0 207.4813 -1.0e-3\n").unwrap();

        let args = RegressionArgs {
            input,
            geometry: "tetrahedron_pec_6".into(),
            frequencies: vec![],
            references: vec![],
            reltol: None,
        };
        assert!(matches!(
            run(args),
            Err(CliError::Engine(EngineError::UnregisteredReference { .. }))
        ));
    }

    #[test]
    fn unknown_geometry_is_an_argument_error() {
        let args = RegressionArgs {
            input: PathBuf::from("missing.byXi"),
            geometry: "dodecahedron".into(),
            frequencies: vec![],
            references: vec![],
            reltol: None,
        };
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }
}
