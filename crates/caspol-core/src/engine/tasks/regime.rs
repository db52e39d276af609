use crate::core::asymptotics::model::AsymptoticModel;
use crate::core::models::dataset::Dataset;
use crate::core::models::row::AveragedRow;
use crate::core::numerics::tolerance::compare;
use crate::engine::error::EngineError;
use crate::engine::report::{CheckKind, CheckReport, Evaluation, Quantity};
use tracing::{debug, trace};

/// Checks every row of a frequency-averaged table against the asymptote of its regime.
///
/// Rows in the crossover zone are counted as skipped; they can neither fail nor pass the check.
pub fn validate(rows: &[AveragedRow], model: &AsymptoticModel, reltol: f64) -> CheckReport {
    let mut report = CheckReport::new();

    for row in rows {
        let z = row.position.z;
        let Some((regime, expected)) = model.expected(z) else {
            trace!("Line {}: z = {:e} lies in the crossover zone, skipped", row.line, z);
            report.skip();
            continue;
        };

        report.record(Evaluation {
            line: row.line,
            distance: z,
            frequency: None,
            kind: CheckKind::Asymptotic(regime),
            quantity: Quantity::Potential,
            measured: row.potential,
            expected,
            reltol,
            outcome: compare(row.potential, expected, reltol),
        });
    }

    debug!(
        "Asymptotic validation: {} evaluated, {} skipped, {} failed",
        report.evaluated(),
        report.skipped,
        report.failures().count()
    );
    report
}

/// Like [`validate`], for a table whose layout was only known at runtime.
pub fn validate_dataset(
    dataset: &Dataset,
    model: &AsymptoticModel,
    reltol: f64,
) -> Result<CheckReport, EngineError> {
    Ok(validate(super::averaged_rows(dataset)?, model, reltol))
}
