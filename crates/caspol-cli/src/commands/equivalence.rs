use super::{checked_reltol, parse_failure};
use crate::cli::EquivalenceArgs;
use crate::error::Result;
use crate::report;
use caspolcheck::core::io::output::{OutputKind, read_dataset};
use caspolcheck::core::numerics::tolerance::VALIDATION_RELTOL;
use caspolcheck::engine::tasks::equivalence::{LabelledRows, check_equivalence};
use caspolcheck::engine::tasks::spectral_rows;
use tracing::info;

pub fn run(args: EquivalenceArgs) -> Result<bool> {
    let reltol = checked_reltol(args.reltol, VALIDATION_RELTOL)?;

    let mut tables = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        info!("Loading per-frequency table from {:?}", path);
        let dataset = read_dataset(path, OutputKind::ByXi).map_err(|e| parse_failure(path, e))?;
        tables.push((path.display().to_string(), dataset));
    }
    let sets = tables
        .iter()
        .map(|(label, dataset)| spectral_rows(dataset).map(|rows| LabelledRows { label, rows }))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let report = check_equivalence(&sets, reltol)?;
    report::print_check(&format!("equivalence of {} tables", sets.len()), &report)?;
    Ok(report.passed())
}
