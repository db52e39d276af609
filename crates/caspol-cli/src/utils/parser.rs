use caspolcheck::engine::config::ScenarioSpec;
use thiserror::Error;

const TAG_PREFIX: &str = "tag:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Scenario filter cannot be empty.")]
    EmptyFilter,

    #[error("Tag cannot be empty in filter '{0}'. Expected 'tag:TAG' (e.g., 'tag:fast').")]
    EmptyTag(String),
}

/// Selects scenarios by exact name or by tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioFilter {
    Name(String),
    Tag(String),
}

impl ScenarioFilter {
    pub fn matches(&self, scenario: &ScenarioSpec) -> bool {
        match self {
            Self::Name(name) => &scenario.name == name,
            Self::Tag(tag) => scenario.has_tag(tag),
        }
    }
}

pub fn parse_scenario_filter(s: &str) -> Result<ScenarioFilter, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::EmptyFilter);
    }
    match s.strip_prefix(TAG_PREFIX) {
        Some(tag) if tag.trim().is_empty() => Err(ParseError::EmptyTag(s.to_string())),
        Some(tag) => Ok(ScenarioFilter::Tag(tag.trim().to_string())),
        None => Ok(ScenarioFilter::Name(s.to_string())),
    }
}
