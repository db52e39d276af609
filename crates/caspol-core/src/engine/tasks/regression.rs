use crate::core::models::row::SpectralRow;
use crate::core::numerics::tolerance::compare;
use crate::core::reference::table::{ExpectedValues, ReferenceTable};
use crate::engine::config::FrequencySelection;
use crate::engine::error::EngineError;
use crate::engine::report::{CheckKind, CheckReport, Evaluation, Quantity};
use tracing::{debug, warn};

/// Resolves the reference values of every selected row before any comparison is made.
///
/// Every unmapped (frequency, distance) pair is logged; the first one is returned as
/// [`EngineError::UnregisteredReference`].
pub fn check_coverage(
    rows: &[SpectralRow],
    table: &ReferenceTable,
    geometry: &str,
    selection: &FrequencySelection,
) -> Result<Vec<Option<ExpectedValues>>, EngineError> {
    let mut resolved = Vec::with_capacity(rows.len());
    let mut first_missing: Option<&SpectralRow> = None;

    for row in rows {
        if !selection.includes(row.frequency) {
            resolved.push(None);
            continue;
        }
        match table.lookup(geometry, row.frequency, row.position.z) {
            Ok(expected) => resolved.push(Some(expected)),
            Err(_) => {
                warn!(
                    "No reference value for '{}' at xi = {:e}, z = {:e} (line {})",
                    geometry, row.frequency, row.position.z, row.line
                );
                if first_missing.is_none() {
                    first_missing = Some(row);
                }
                resolved.push(None);
            }
        }
    }

    match first_missing {
        Some(row) => Err(EngineError::UnregisteredReference {
            geometry: geometry.to_string(),
            frequency: row.frequency,
            distance: row.position.z,
            line: row.line,
        }),
        None => Ok(resolved),
    }
}

/// Compares polarizability and potential of every selected row with its registered value.
pub fn check_references(
    rows: &[SpectralRow],
    table: &ReferenceTable,
    geometry: &str,
    selection: &FrequencySelection,
    reltol: f64,
) -> Result<CheckReport, EngineError> {
    let resolved = check_coverage(rows, table, geometry, selection)?;
    let mut report = CheckReport::new();

    for (row, expected) in rows.iter().zip(resolved) {
        let Some(expected) = expected else {
            report.skip();
            continue;
        };

        for (quantity, measured, reference) in [
            (
                Quantity::Polarizability,
                row.polarizability,
                expected.polarizability,
            ),
            (Quantity::Potential, row.potential, expected.potential),
        ] {
            report.record(Evaluation {
                line: row.line,
                distance: row.position.z,
                frequency: Some(row.frequency),
                kind: CheckKind::Reference {
                    geometry: geometry.to_string(),
                },
                quantity,
                measured,
                expected: reference,
                reltol,
                outcome: compare(measured, reference, reltol),
            });
        }
    }

    debug!(
        "Reference regression for '{}': {} comparisons, {} rows outside selection",
        geometry,
        report.evaluated(),
        report.skipped
    );
    Ok(report)
}
