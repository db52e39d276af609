use crate::core::models::row::SpectralRow;
use crate::core::numerics::tolerance::compare;
use crate::core::reference::table::ReferenceKey;
use crate::engine::error::EngineError;
use crate::engine::report::{CheckKind, CheckReport, Evaluation, Quantity};
use std::collections::HashMap;
use tracing::debug;

/// A per-frequency table together with the name of the geometry description that produced it.
#[derive(Debug, Clone, Copy)]
pub struct LabelledRows<'a> {
    pub label: &'a str,
    pub rows: &'a [SpectralRow],
}

/// Indexes rows by (frequency, distance); each key may occur only once per table.
fn index_rows<'a>(
    table: LabelledRows<'a>,
) -> Result<HashMap<ReferenceKey, &'a SpectralRow>, EngineError> {
    let mut index = HashMap::with_capacity(table.rows.len());
    for row in table.rows {
        let key = ReferenceKey::new(row.frequency, row.position.z);
        if index.insert(key, row).is_some() {
            return Err(EngineError::DuplicateRow {
                label: table.label.to_string(),
                frequency: row.frequency,
                distance: row.position.z,
                line: row.line,
            });
        }
    }
    Ok(index)
}

fn unpaired(row: &SpectralRow, present_in: &str, missing_from: &str) -> EngineError {
    EngineError::UnpairedRow {
        present_in: present_in.to_string(),
        missing_from: missing_from.to_string(),
        frequency: row.frequency,
        distance: row.position.z,
    }
}

fn compare_pair(
    baseline: LabelledRows<'_>,
    candidate: LabelledRows<'_>,
    reltol: f64,
    report: &mut CheckReport,
) -> Result<(), EngineError> {
    let baseline_index = index_rows(baseline)?;
    let candidate_index = index_rows(candidate)?;

    if let Some(row) = candidate.rows.iter().find(|row| {
        !baseline_index.contains_key(&ReferenceKey::new(row.frequency, row.position.z))
    }) {
        return Err(unpaired(row, candidate.label, baseline.label));
    }

    for base in baseline.rows {
        let key = ReferenceKey::new(base.frequency, base.position.z);
        let other = candidate_index
            .get(&key)
            .ok_or_else(|| unpaired(base, baseline.label, candidate.label))?;

        for (quantity, measured, expected) in [
            (
                Quantity::Polarizability,
                other.polarizability,
                base.polarizability,
            ),
            (Quantity::Potential, other.potential, base.potential),
        ] {
            report.record(Evaluation {
                line: other.line,
                distance: base.position.z,
                frequency: Some(base.frequency),
                kind: CheckKind::Equivalence {
                    baseline: baseline.label.to_string(),
                    candidate: candidate.label.to_string(),
                },
                quantity,
                measured,
                expected,
                reltol,
                outcome: compare(measured, expected, reltol),
            });
        }
    }
    Ok(())
}

/// Compares every pair of tables that describe the same physical configuration.
///
/// Rows are matched exactly on (distance, frequency); a row without a partner in the other
/// table, or two rows of one table sharing a key, is an error rather than a skipped comparison.
pub fn check_equivalence(
    datasets: &[LabelledRows<'_>],
    reltol: f64,
) -> Result<CheckReport, EngineError> {
    if datasets.len() < 2 {
        return Err(EngineError::Internal(format!(
            "equivalence needs at least two datasets, got {}",
            datasets.len()
        )));
    }

    let mut report = CheckReport::new();
    for (i, baseline) in datasets.iter().enumerate() {
        for candidate in &datasets[i + 1..] {
            compare_pair(*baseline, *candidate, reltol, &mut report)?;
        }
    }

    debug!(
        "Equivalence of {} datasets: {} comparisons, {} failed",
        datasets.len(),
        report.evaluated(),
        report.failures().count()
    );
    Ok(report)
}
