use caspolcheck::engine::report::{CheckReport, ScenarioVerdict, SuiteReport};
use std::io::{self, Write};

const MAX_LISTED_FAILURES: usize = 20;

pub fn write_check(w: &mut impl Write, title: &str, report: &CheckReport) -> io::Result<()> {
    if report.is_vacuous() {
        writeln!(
            w,
            "✗ {}: no row was evaluated ({} skipped)",
            title, report.skipped
        )?;
        return Ok(());
    }

    let failed = report.failures().count();
    if failed == 0 {
        writeln!(
            w,
            "✓ {}: {} comparisons passed ({} skipped)",
            title,
            report.evaluated(),
            report.skipped
        )?;
        return Ok(());
    }

    writeln!(
        w,
        "✗ {}: {} of {} comparisons failed ({} skipped)",
        title,
        failed,
        report.evaluated(),
        report.skipped
    )?;
    for evaluation in report.failures().take(MAX_LISTED_FAILURES) {
        writeln!(w, "    {}", evaluation)?;
    }
    if failed > MAX_LISTED_FAILURES {
        writeln!(w, "    ... and {} more", failed - MAX_LISTED_FAILURES)?;
    }
    Ok(())
}

pub fn write_suite(w: &mut impl Write, report: &SuiteReport) -> io::Result<()> {
    for outcome in &report.outcomes {
        match &outcome.verdict {
            ScenarioVerdict::Checked(check) => write_check(w, &outcome.name, check)?,
            ScenarioVerdict::Aborted(e) => writeln!(w, "✗ {}: aborted: {}", outcome.name, e)?,
        }
    }
    writeln!(
        w,
        "\n{} passed, {} failed, {} simulator run(s)",
        report.passed_count(),
        report.failed_count(),
        report.simulator_runs
    )
}

pub fn print_check(title: &str, report: &CheckReport) -> io::Result<()> {
    write_check(&mut io::stdout().lock(), title, report)
}

pub fn print_suite(report: &SuiteReport) -> io::Result<()> {
    write_suite(&mut io::stdout().lock(), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caspolcheck::core::asymptotics::model::Regime;
    use caspolcheck::core::numerics::tolerance::Comparison;
    use caspolcheck::engine::error::EngineError;
    use caspolcheck::engine::report::{CheckKind, Evaluation, Quantity, ScenarioOutcome};

    fn evaluation(measured: f64, outcome: Comparison) -> Evaluation {
        Evaluation {
            line: 3,
            distance: 0.001,
            frequency: None,
            kind: CheckKind::Asymptotic(Regime::ShortRange),
            quantity: Quantity::Potential,
            measured,
            expected: -1.38e7,
            reltol: 0.01,
            outcome,
        }
    }

    fn render(report: &SuiteReport) -> String {
        let mut out = Vec::new();
        write_suite(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn passing_check_is_one_line() {
        let mut check = CheckReport::new();
        check.record(evaluation(-1.38e7, Comparison::Pass));
        check.skip();

        let mut out = Vec::new();
        write_check(&mut out, "plate", &check).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "✓ plate: 1 comparisons passed (1 skipped)\n"
        );
    }

    #[test]
    fn empty_check_is_reported_as_failing() {
        let mut check = CheckReport::new();
        check.skip();
        check.skip();

        let mut out = Vec::new();
        write_check(&mut out, "plate", &check).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "✗ plate: no row was evaluated (2 skipped)\n"
        );
    }

    #[test]
    fn suite_lists_failures_and_aborted_scenarios() {
        let mut check = CheckReport::new();
        check.record(evaluation(1.38e7, Comparison::SignMismatch));
        let report = SuiteReport {
            outcomes: vec![
                ScenarioOutcome {
                    name: "pec-plate-asymptotics".into(),
                    verdict: ScenarioVerdict::Checked(check),
                },
                ScenarioOutcome {
                    name: "coin-xi0".into(),
                    verdict: ScenarioVerdict::Aborted(EngineError::ExternalComputationFailed {
                        command: "scuff-caspol".into(),
                        reason: "exit status: 1".into(),
                    }),
                },
            ],
            simulator_runs: 2,
        };

        let text = render(&report);
        assert!(text.contains("✗ pec-plate-asymptotics: 1 of 1 comparisons failed"));
        assert!(text.contains("    line 3"));
        assert!(text.contains("✗ coin-xi0: aborted: External computation failed"));
        assert!(text.ends_with("0 passed, 2 failed, 2 simulator run(s)\n"));
    }
}
