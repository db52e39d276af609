use super::error::EngineError;
use crate::core::asymptotics::model::Regime;
use crate::core::numerics::tolerance::{Comparison, log_deviation};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Potential,
    Polarizability,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Potential => write!(f, "CP potential"),
            Self::Polarizability => write!(f, "polarizability"),
        }
    }
}

/// What a measured value was held against.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckKind {
    Asymptotic(Regime),
    Reference { geometry: String },
    Equivalence { baseline: String, candidate: String },
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asymptotic(regime) => write!(f, "{regime} asymptote"),
            Self::Reference { geometry } => write!(f, "reference value for '{geometry}'"),
            Self::Equivalence {
                baseline,
                candidate,
            } => write!(f, "'{candidate}' against '{baseline}'"),
        }
    }
}

/// One comparison of one quantity on one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub line: usize,
    pub distance: f64,
    pub frequency: Option<f64>,
    pub kind: CheckKind,
    pub quantity: Quantity,
    pub measured: f64,
    pub expected: f64,
    pub reltol: f64,
    pub outcome: Comparison,
}

impl Evaluation {
    pub fn passed(&self) -> bool {
        self.outcome.is_pass()
    }

    pub fn deviation(&self) -> Option<f64> {
        log_deviation(self.measured, self.expected)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: z = {:e}", self.line, self.distance)?;
        if let Some(xi) = self.frequency {
            write!(f, ", xi = {xi:e}")?;
        }
        write!(
            f,
            ": {} vs {}: {} (measured {:e}, expected {:e}, reltol {})",
            self.quantity, self.kind, self.outcome, self.measured, self.expected, self.reltol
        )
    }
}

/// All evaluations of one check, plus the rows it deliberately left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    pub evaluations: Vec<Evaluation>,
    pub skipped: usize,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, evaluation: Evaluation) {
        self.evaluations.push(evaluation);
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn absorb(&mut self, other: CheckReport) {
        self.evaluations.extend(other.evaluations);
        self.skipped += other.skipped;
    }

    /// A check passes iff at least one row was evaluated and none failed.
    ///
    /// Skipped rows carry no signal, so a table that is empty or lies entirely in the
    /// crossover zone does not pass.
    pub fn passed(&self) -> bool {
        !self.is_vacuous() && self.evaluations.iter().all(Evaluation::passed)
    }

    /// True when no row was compared at all.
    pub fn is_vacuous(&self) -> bool {
        self.evaluations.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Evaluation> {
        self.evaluations.iter().filter(|e| !e.passed())
    }

    pub fn evaluated(&self) -> usize {
        self.evaluations.len()
    }
}

#[derive(Debug)]
pub enum ScenarioVerdict {
    Checked(CheckReport),
    Aborted(EngineError),
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub verdict: ScenarioVerdict,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        matches!(&self.verdict, ScenarioVerdict::Checked(report) if report.passed())
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<ScenarioOutcome>,
    pub simulator_runs: usize,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(ScenarioOutcome::passed)
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }

    pub fn outcome(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(outcome: Comparison) -> Evaluation {
        Evaluation {
            line: 7,
            distance: 0.001,
            frequency: None,
            kind: CheckKind::Asymptotic(Regime::ShortRange),
            quantity: Quantity::Potential,
            measured: -1.5e7,
            expected: -1.38e7,
            reltol: 0.01,
            outcome,
        }
    }

    #[test]
    fn report_passes_only_without_failures() {
        let mut report = CheckReport::new();
        report.skip();
        assert!(!report.passed());
        assert!(report.is_vacuous());
        report.record(evaluation(Comparison::Pass));
        assert!(report.passed());
        report.record(evaluation(Comparison::ToleranceExceeded));
        assert!(!report.passed());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.evaluated(), 2);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn empty_report_does_not_pass() {
        let report = CheckReport::new();
        assert!(!report.passed());
        assert_eq!(report.failures().count(), 0);

        let outcome = ScenarioOutcome {
            name: "header-only".into(),
            verdict: ScenarioVerdict::Checked(report),
        };
        assert!(!outcome.passed());
    }

    #[test]
    fn failure_description_names_row_kind_and_values() {
        let text = evaluation(Comparison::ToleranceExceeded).to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("short-range asymptote"));
        assert!(text.contains("values differ beyond allowed tolerance"));
        assert!(text.contains("-1.5e7"));
        assert!(text.contains("-1.38e7"));
    }

    #[test]
    fn aborted_scenario_never_passes() {
        let outcome = ScenarioOutcome {
            name: "broken".into(),
            verdict: ScenarioVerdict::Aborted(EngineError::Internal("boom".into())),
        };
        assert!(!outcome.passed());
        let suite = SuiteReport {
            outcomes: vec![outcome],
            simulator_runs: 0,
        };
        assert!(!suite.passed());
        assert_eq!(suite.failed_count(), 1);
    }
}
