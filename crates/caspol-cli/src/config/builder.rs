use super::defaults::DefaultsConfig;
use super::file::{FileCheck, FileConfig, FileModel, FileScenario};
use super::models::AppConfig;
use crate::cli::SuiteArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use caspolcheck::core::asymptotics::model::AsymptoticModel;
use caspolcheck::core::catalog::builtin_model;
use caspolcheck::core::numerics::tolerance::Tolerances;
use caspolcheck::core::reference::table::ReferenceTable;
use caspolcheck::engine::config::{
    FrequencySelection, ScenarioCheck, ScenarioSpec, ValidationConfigBuilder,
};
use caspolcheck::engine::external::{FrequencySelector, GeometrySelector, Invocation};
use caspolcheck::workflows::suite::{TAG_SLOW, standard_suite};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn build_config(args: &SuiteArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let (file_config, config_dir) = match &args.config {
        Some(path) => {
            let file_config = FileConfig::from_file(path)?;
            let dir = absolute_dir(path.parent().unwrap_or(Path::new("")))?;
            (file_config, dir)
        }
        None => (FileConfig::default(), absolute_dir(Path::new(""))?),
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let data_dir = match (&args.data_dir, &file_config.data_dir) {
        (Some(dir), _) => absolute_dir(dir)?,
        (None, Some(dir)) => resolve(&config_dir, dir),
        (None, None) => config_dir.clone(),
    };

    // A bare name is looked up on PATH; anything with a directory part must survive the
    // simulator switching into its run directory.
    let program = match (&args.program, file_config.program.take()) {
        (Some(program), _) if program.components().count() > 1 => std::path::absolute(program)?,
        (Some(program), _) => program.clone(),
        (None, Some(program)) if program.components().count() > 1 => {
            resolve(&config_dir, &program)
        }
        (None, Some(program)) => program,
        (None, None) => PathBuf::from(&defaults.program),
    };

    let file_tolerances = file_config.tolerances.take().unwrap_or_default();
    let tolerances = Tolerances {
        default: file_tolerances
            .default
            .unwrap_or(defaults.default_reltol),
        validation: file_tolerances
            .validation
            .unwrap_or(defaults.validation_reltol),
    };

    let mut references = if file_config
        .builtin_references
        .unwrap_or(defaults.builtin_references)
    {
        ReferenceTable::builtin()
    } else {
        ReferenceTable::new()
    };
    for csv in &file_config.references {
        let path = resolve(&config_dir, csv);
        info!("Loading reference values from {:?}", path);
        let table = ReferenceTable::load_csv(&path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
        references
            .merge(&table)
            .map_err(|e| CliError::Config(e.to_string()))?;
    }

    let mut scenarios = Vec::new();
    if file_config.standard_suite.unwrap_or(args.config.is_none()) {
        scenarios.extend(standard_suite(&data_dir).map_err(|e| CliError::Config(e.to_string()))?);
    }
    for scenario in file_config.scenarios {
        scenarios.push(convert_scenario(scenario, &data_dir, &defaults)?);
    }
    let scenarios = select_scenarios(scenarios, &args.only, args.skip_slow)?;

    let validation = ValidationConfigBuilder::new()
        .tolerances(tolerances)
        .references(references)
        .scenarios(scenarios)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        program,
        data_dir,
        validation,
    })
}

fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    if dir.as_os_str().is_empty() {
        Ok(std::env::current_dir()?)
    } else {
        Ok(std::path::absolute(dir)?)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn convert_scenario(
    scenario: FileScenario,
    data_dir: &Path,
    defaults: &DefaultsConfig,
) -> Result<ScenarioSpec> {
    let FileScenario {
        name,
        tags,
        reltol,
        evaluation_points,
        atom,
        geometry_file,
        xi_file,
        xi,
        temperature,
        check,
    } = scenario;
    let invalid = |reason: String| CliError::Config(format!("scenario '{name}': {reason}"));

    let frequency = match (xi_file, xi, temperature) {
        (Some(path), None, None) => FrequencySelector::List(resolve(data_dir, &path)),
        (None, Some(xi), None) => FrequencySelector::Single(xi),
        (None, None, Some(t)) => FrequencySelector::Temperature(t),
        _ => {
            return Err(invalid(
                "exactly one of `xi-file`, `xi` or `temperature` must be set".to_string(),
            ));
        }
    };
    let geometry = geometry_file
        .map(|path| GeometrySelector::File(resolve(data_dir, &path)))
        .unwrap_or(GeometrySelector::PecPlate);

    let invocation = Invocation {
        evaluation_points: resolve(data_dir, &evaluation_points),
        atom: atom.unwrap_or_else(|| defaults.atom.clone()),
        geometry,
        frequency,
    };

    let check = match check {
        FileCheck::Asymptotic {
            model: FileModel::Named(model_name),
        } => ScenarioCheck::Asymptotic {
            model: builtin_model(&model_name)
                .ok_or_else(|| invalid(format!("unknown built-in model '{model_name}'")))?,
        },
        FileCheck::Asymptotic {
            model: FileModel::Custom(params),
        } => ScenarioCheck::Asymptotic {
            model: AsymptoticModel::new(params).map_err(|e| invalid(e.to_string()))?,
        },
        FileCheck::Reference {
            geometry,
            frequencies,
        } => ScenarioCheck::Reference {
            geometry: geometry.unwrap_or_else(|| invocation.geometry_id()),
            frequencies: frequencies
                .map(FrequencySelection::Only)
                .unwrap_or_default(),
        },
        FileCheck::Equivalence { alternates } => ScenarioCheck::Equivalence {
            alternates: alternates
                .iter()
                .map(|path| Invocation {
                    geometry: GeometrySelector::File(resolve(data_dir, path)),
                    ..invocation.clone()
                })
                .collect(),
        },
    };

    Ok(ScenarioSpec {
        name,
        tags: tags.into_iter().collect(),
        invocation,
        check,
        reltol,
    })
}

fn select_scenarios(
    scenarios: Vec<ScenarioSpec>,
    only: &[String],
    skip_slow: bool,
) -> Result<Vec<ScenarioSpec>> {
    let filters = only
        .iter()
        .map(|s| parser::parse_scenario_filter(s))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CliError::Argument(e.to_string()))?;

    let available = scenarios.len();
    let selected: Vec<_> = scenarios
        .into_iter()
        .filter(|s| filters.is_empty() || filters.iter().any(|f| f.matches(s)))
        .filter(|s| !(skip_slow && s.has_tag(TAG_SLOW)))
        .collect();

    if selected.is_empty() {
        return Err(CliError::Argument(format!(
            "No scenario matches the selection ({available} available)."
        )));
    }
    debug!(
        "Selected {} of {} scenarios",
        selected.len(),
        available
    );
    Ok(selected)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let invalid_float =
            |_| CliError::Config(format!("Invalid float value for {}: {}", key, value_str));
        let invalid_bool =
            |_| CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str));

        match key {
            "program" => config.program = Some(PathBuf::from(value_str)),
            "data-dir" => config.data_dir = Some(PathBuf::from(value_str)),
            "standard-suite" => {
                config.standard_suite = Some(value_str.parse().map_err(invalid_bool)?);
            }
            "builtin-references" => {
                config.builtin_references = Some(value_str.parse().map_err(invalid_bool)?);
            }
            "tolerances.default" => {
                config
                    .tolerances
                    .get_or_insert_with(Default::default)
                    .default = Some(value_str.parse().map_err(invalid_float)?);
            }
            "tolerances.validation" => {
                config
                    .tolerances
                    .get_or_insert_with(Default::default)
                    .validation = Some(value_str.parse().map_err(invalid_float)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
