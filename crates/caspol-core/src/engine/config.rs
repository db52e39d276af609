use super::external::{FrequencySelector, Invocation};
use crate::core::asymptotics::model::AsymptoticModel;
use crate::core::numerics::tolerance::{Tolerances, is_valid_reltol};
use crate::core::reference::table::ReferenceTable;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid relative tolerance {value} for {context}: must be finite and positive")]
    InvalidTolerance { context: String, value: f64 },
    #[error("Duplicate scenario name '{0}'")]
    DuplicateScenario(String),
    #[error("Scenario '{scenario}': {reason}")]
    InvalidScenario { scenario: String, reason: String },
}

/// Which rows of a per-frequency table a reference check covers.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FrequencySelection {
    /// Every row must have a registered reference value.
    #[default]
    All,
    /// Only rows at these frequencies are checked; each of them must be registered.
    Only(Vec<f64>),
}

impl FrequencySelection {
    pub fn includes(&self, frequency: f64) -> bool {
        match self {
            Self::All => true,
            Self::Only(frequencies) => frequencies.iter().any(|&xi| xi == frequency),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioCheck {
    /// Frequency-averaged table against short- and long-range asymptotes.
    Asymptotic { model: AsymptoticModel },
    /// Per-frequency table against pre-verified exact values.
    Reference {
        geometry: String,
        frequencies: FrequencySelection,
    },
    /// Per-frequency tables of equivalent geometry descriptions, compared pairwise.
    Equivalence { alternates: Vec<Invocation> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSpec {
    pub name: String,
    pub tags: BTreeSet<String>,
    pub invocation: Invocation,
    pub check: ScenarioCheck,
    /// Overrides the suite tolerance for this scenario's check.
    pub reltol: Option<f64>,
}

impl ScenarioSpec {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Tolerance this scenario is judged at.
    pub fn effective_reltol(&self, tolerances: &Tolerances) -> f64 {
        self.reltol.unwrap_or(match self.check {
            ScenarioCheck::Reference { .. } => tolerances.default,
            ScenarioCheck::Asymptotic { .. } | ScenarioCheck::Equivalence { .. } => {
                tolerances.validation
            }
        })
    }

    fn validate(&self, references: &ReferenceTable) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidScenario {
            scenario: self.name.clone(),
            reason,
        };

        if let Some(reltol) = self.reltol {
            if !is_valid_reltol(reltol) {
                return Err(ConfigError::InvalidTolerance {
                    context: format!("scenario '{}'", self.name),
                    value: reltol,
                });
            }
        }

        match &self.check {
            ScenarioCheck::Asymptotic { .. } => {
                if !matches!(self.invocation.frequency, FrequencySelector::Temperature(_)) {
                    return Err(invalid(
                        "asymptotic checks need a temperature selector to produce an averaged table"
                            .into(),
                    ));
                }
            }
            ScenarioCheck::Reference { geometry, .. } => {
                if !references.contains_geometry(geometry) {
                    return Err(invalid(format!(
                        "no reference values are registered for geometry '{geometry}'"
                    )));
                }
            }
            ScenarioCheck::Equivalence { alternates } => {
                if alternates.is_empty() {
                    return Err(invalid(
                        "equivalence checks need at least one alternate invocation".into(),
                    ));
                }
                let mut ids = HashSet::new();
                ids.insert(self.invocation.geometry_id());
                for alternate in alternates {
                    if !ids.insert(alternate.geometry_id()) {
                        return Err(invalid(format!(
                            "alternate geometry '{}' would overwrite another variant's output",
                            alternate.geometry_id()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    pub tolerances: Tolerances,
    pub references: ReferenceTable,
    pub scenarios: Vec<ScenarioSpec>,
}

#[derive(Default)]
pub struct ValidationConfigBuilder {
    tolerances: Option<Tolerances>,
    references: Option<ReferenceTable>,
    scenarios: Vec<ScenarioSpec>,
}

impl ValidationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = Some(tolerances);
        self
    }
    pub fn references(mut self, references: ReferenceTable) -> Self {
        self.references = Some(references);
        self
    }
    pub fn scenario(mut self, scenario: ScenarioSpec) -> Self {
        self.scenarios.push(scenario);
        self
    }
    pub fn scenarios(mut self, scenarios: impl IntoIterator<Item = ScenarioSpec>) -> Self {
        self.scenarios.extend(scenarios);
        self
    }

    pub fn build(self) -> Result<ValidationConfig, ConfigError> {
        let tolerances = self
            .tolerances
            .ok_or(ConfigError::MissingParameter("tolerances"))?;
        let references = self
            .references
            .ok_or(ConfigError::MissingParameter("references"))?;
        if self.scenarios.is_empty() {
            return Err(ConfigError::MissingParameter("scenarios"));
        }

        for (context, value) in [
            ("the default tolerance", tolerances.default),
            ("the validation tolerance", tolerances.validation),
        ] {
            if !is_valid_reltol(value) {
                return Err(ConfigError::InvalidTolerance {
                    context: context.to_string(),
                    value,
                });
            }
        }

        let mut names = HashSet::new();
        for scenario in &self.scenarios {
            if !names.insert(scenario.name.as_str()) {
                return Err(ConfigError::DuplicateScenario(scenario.name.clone()));
            }
            scenario.validate(&references)?;
        }

        Ok(ValidationConfig {
            tolerances,
            references,
            scenarios: self.scenarios,
        })
    }
}
