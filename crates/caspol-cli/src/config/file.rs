use crate::error::{CliError, Result};
use caspolcheck::core::asymptotics::model::ModelParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub program: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub standard_suite: Option<bool>,
    pub builtin_references: Option<bool>,
    #[serde(default)]
    pub references: Vec<PathBuf>,
    pub tolerances: Option<FileTolerances>,
    #[serde(default, rename = "scenario")]
    pub scenarios: Vec<FileScenario>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileTolerances {
    pub default: Option<f64>,
    pub validation: Option<f64>,
}

/// One `[[scenario]]` table. Without `geometry-file` the built-in PEC plate is used.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileScenario {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub reltol: Option<f64>,
    pub evaluation_points: PathBuf,
    pub atom: Option<String>,
    pub geometry_file: Option<PathBuf>,
    pub xi_file: Option<PathBuf>,
    pub xi: Option<f64>,
    pub temperature: Option<f64>,
    pub check: FileCheck,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum FileCheck {
    Asymptotic {
        model: FileModel,
    },
    Reference {
        geometry: Option<String>,
        frequencies: Option<Vec<f64>>,
    },
    Equivalence {
        alternates: Vec<PathBuf>,
    },
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum FileModel {
    Named(String),
    Custom(ModelParams),
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading suite file from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenarios_of_every_kind() {
        let config = FileConfig::from_toml(
            r#"
            program = "/opt/scuff/bin/scuff-caspol"
            references = ["extra.csv"]

            [tolerances]
            default = 0.05

            [[scenario]]
            name = "plate-xi6"
            tags = ["fast"]
            evaluation-points = "dist.txt"
            xi-file = "freq.txt"
            check = { type = "reference", frequencies = [6.0] }

            [[scenario]]
            name = "plate-asymptotics"
            evaluation-points = "distvalidate.txt"
            temperature = 1.0
            check = { type = "asymptotic", model = "pec-plate" }

            [[scenario]]
            name = "custom-asymptotics"
            evaluation-points = "distvalidate.txt"
            geometry-file = "thinplate_pec.scuffgeo"
            temperature = 1.0

            [scenario.check]
            type = "asymptotic"
            model = { short-threshold = 0.001, long-threshold = 0.02, c-sr = 0.0138, c-lr = 8.83e-5 }

            [[scenario]]
            name = "materials"
            evaluation-points = "dist.txt"
            geometry-file = "tetrahedron_eps10_6.scuffgeo"
            xi = 6.0
            check = { type = "equivalence", alternates = ["tetrahedron_eps10_func_6.scuffgeo"] }
            "#,
        )
        .unwrap();

        assert_eq!(config.scenarios.len(), 4);
        assert_eq!(config.tolerances.unwrap().default, Some(0.05));
        assert!(matches!(
            &config.scenarios[0].check,
            FileCheck::Reference { geometry: None, frequencies: Some(f) } if f == &[6.0]
        ));
        assert!(matches!(
            &config.scenarios[1].check,
            FileCheck::Asymptotic { model: FileModel::Named(name) } if name == "pec-plate"
        ));
        assert!(matches!(
            &config.scenarios[2].check,
            FileCheck::Asymptotic { model: FileModel::Custom(p) } if p.c_lr == 8.83e-5
        ));
        assert!(matches!(
            &config.scenarios[3].check,
            FileCheck::Equivalence { alternates } if alternates.len() == 1
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("workers = 4").is_err());
        assert!(
            FileConfig::from_toml(
                r#"
                [[scenario]]
                name = "a"
                evaluation-points = "dist.txt"
                xi = 6.0
                colour = "red"
                check = { type = "reference" }
                "#
            )
            .is_err()
        );
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = FileConfig::from_file(Path::new("/nonexistent/suite.toml")).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { ref path, .. } if path.ends_with("suite.toml")));
    }
}
