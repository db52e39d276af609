use crate::core::io::output::{AveragedFile, ByXiFile};
use crate::core::io::traits::OutputFile;
use crate::engine::cache::ComputationCache;
use crate::engine::config::{ScenarioCheck, ScenarioSpec, ValidationConfig};
use crate::engine::error::EngineError;
use crate::engine::external::{Invocation, ProducedOutputs, Simulator};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::report::{CheckReport, ScenarioOutcome, ScenarioVerdict, SuiteReport};
use crate::engine::tasks::equivalence::{LabelledRows, check_equivalence};
use crate::engine::tasks::{regime, regression};
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Runs every scenario of `config` in order and collects one verdict per scenario.
///
/// Simulator runs go through `cache`, so scenarios sharing an invocation share its output,
/// and each distinct run writes into its own `run-NNN` directory below `workdir`. An error
/// inside a scenario becomes that scenario's [`ScenarioVerdict::Aborted`]; the remaining
/// scenarios still run.
#[instrument(skip_all, name = "validation_workflow")]
pub fn run<S: Simulator + ?Sized>(
    config: &ValidationConfig,
    simulator: &S,
    workdir: &Path,
    cache: &mut ComputationCache,
    reporter: &ProgressReporter,
) -> SuiteReport {
    reporter.report(Progress::SuiteStart {
        scenarios: config.scenarios.len() as u64,
    });
    info!(
        "Running {} scenarios in {:?}",
        config.scenarios.len(),
        workdir
    );

    let executions_before = cache.executions();
    let mut outcomes = Vec::with_capacity(config.scenarios.len());

    for scenario in &config.scenarios {
        reporter.report(Progress::ScenarioStart {
            name: scenario.name.clone(),
        });

        let verdict = match run_scenario(scenario, config, simulator, workdir, cache, reporter) {
            Ok(report) => {
                if report.is_vacuous() {
                    warn!(
                        "Scenario '{}' evaluated no rows ({} skipped)",
                        scenario.name, report.skipped
                    );
                } else if !report.passed() {
                    warn!(
                        "Scenario '{}' failed: {} of {} comparisons out of tolerance",
                        scenario.name,
                        report.failures().count(),
                        report.evaluated()
                    );
                }
                ScenarioVerdict::Checked(report)
            }
            Err(e) => {
                warn!("Scenario '{}' aborted: {}", scenario.name, e);
                ScenarioVerdict::Aborted(e)
            }
        };

        let outcome = ScenarioOutcome {
            name: scenario.name.clone(),
            verdict,
        };
        reporter.report(Progress::ScenarioFinish {
            name: outcome.name.clone(),
            passed: outcome.passed(),
        });
        outcomes.push(outcome);
    }

    reporter.report(Progress::SuiteFinish);

    let report = SuiteReport {
        outcomes,
        simulator_runs: cache.executions() - executions_before,
    };
    info!(
        "Suite finished: {} passed, {} failed, {} simulator runs",
        report.passed_count(),
        report.failed_count(),
        report.simulator_runs
    );
    report
}

fn run_scenario<S: Simulator + ?Sized>(
    scenario: &ScenarioSpec,
    config: &ValidationConfig,
    simulator: &S,
    workdir: &Path,
    cache: &mut ComputationCache,
    reporter: &ProgressReporter,
) -> Result<CheckReport, EngineError> {
    let reltol = scenario.effective_reltol(&config.tolerances);

    match &scenario.check {
        ScenarioCheck::Asymptotic { model } => {
            let produced = produce(&scenario.invocation, simulator, workdir, cache, reporter)?;
            let path = produced.averaged.ok_or_else(|| {
                EngineError::Internal(format!(
                    "scenario '{}' produced no averaged table",
                    scenario.name
                ))
            })?;
            let rows = read_table::<AveragedFile>(&path)?;
            Ok(regime::validate(&rows, model, reltol))
        }
        ScenarioCheck::Reference {
            geometry,
            frequencies,
        } => {
            let produced = produce(&scenario.invocation, simulator, workdir, cache, reporter)?;
            let rows = read_table::<ByXiFile>(&produced.by_xi)?;
            regression::check_references(&rows, &config.references, geometry, frequencies, reltol)
        }
        ScenarioCheck::Equivalence { alternates } => {
            let mut tables = Vec::with_capacity(alternates.len() + 1);
            for invocation in std::iter::once(&scenario.invocation).chain(alternates) {
                let produced = produce(invocation, simulator, workdir, cache, reporter)?;
                let rows = read_table::<ByXiFile>(&produced.by_xi)?;
                tables.push((invocation.geometry_id(), rows));
            }
            let sets: Vec<_> = tables
                .iter()
                .map(|(label, rows)| LabelledRows { label, rows })
                .collect();
            check_equivalence(&sets, reltol)
        }
    }
}

fn produce<S: Simulator + ?Sized>(
    invocation: &Invocation,
    simulator: &S,
    workdir: &Path,
    cache: &mut ComputationCache,
    reporter: &ProgressReporter,
) -> Result<ProducedOutputs, EngineError> {
    cache.get_or_compute(invocation, |invocation, run_index| {
        let command = simulator.describe(invocation);
        let run_dir = workdir.join(format!("run-{run_index:03}"));
        fs::create_dir_all(&run_dir).map_err(|e| EngineError::ExternalComputationFailed {
            command: command.clone(),
            reason: format!("cannot create run directory '{}': {}", run_dir.display(), e),
        })?;

        reporter.report(Progress::ExternalRun {
            command: command.clone(),
        });
        let produced = simulator.run(invocation, &run_dir)?;
        produced.ensure_exist(&command)?;
        Ok(produced)
    })
}

fn read_table<F: OutputFile>(path: &Path) -> Result<Vec<F::Row>, EngineError> {
    F::read_from_path(path).map_err(|source| EngineError::Table {
        path: path.to_path_buf(),
        source,
    })
}
