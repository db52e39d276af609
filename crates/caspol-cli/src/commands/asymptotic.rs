use super::{checked_reltol, parse_failure};
use crate::cli::{AsymptoticArgs, ModelOverrides};
use crate::error::{CliError, Result};
use crate::report;
use caspolcheck::core::asymptotics::model::{AsymptoticModel, ModelParams};
use caspolcheck::core::catalog::{builtin_model, builtin_model_names};
use caspolcheck::core::io::output::{OutputKind, read_dataset};
use caspolcheck::core::numerics::tolerance::VALIDATION_RELTOL;
use caspolcheck::engine::tasks::regime;
use tracing::info;

pub fn run(args: AsymptoticArgs) -> Result<bool> {
    let model = resolve_model(args.model.as_deref(), &args.params)?;
    let reltol = checked_reltol(args.reltol, VALIDATION_RELTOL)?;

    info!("Loading averaged table from {:?}", &args.input);
    let dataset = read_dataset(&args.input, OutputKind::Averaged)
        .map_err(|e| parse_failure(&args.input, e))?;

    let report = regime::validate_dataset(&dataset, &model, reltol)?;
    report::print_check(&args.input.display().to_string(), &report)?;
    Ok(report.passed())
}

fn resolve_model(name: Option<&str>, overrides: &ModelOverrides) -> Result<AsymptoticModel> {
    let base = match name {
        Some(name) => {
            let model = builtin_model(name).ok_or_else(|| {
                CliError::Argument(format!(
                    "Unknown model '{}'. Available: {}",
                    name,
                    builtin_model_names().join(", ")
                ))
            })?;
            Some(*model.params())
        }
        None => None,
    };

    let pick = |flag: Option<f64>, from_model: Option<f64>, arg: &str| {
        flag.or(from_model)
            .ok_or_else(|| CliError::Argument(format!("--{} is required without --model", arg)))
    };
    let params = ModelParams {
        short_threshold: pick(
            overrides.short_threshold,
            base.map(|p| p.short_threshold),
            "short-threshold",
        )?,
        long_threshold: pick(
            overrides.long_threshold,
            base.map(|p| p.long_threshold),
            "long-threshold",
        )?,
        c_sr: pick(overrides.c_sr, base.map(|p| p.c_sr), "c-sr")?,
        c_lr: pick(overrides.c_lr, base.map(|p| p.c_lr), "c-lr")?,
    };

    AsymptoticModel::new(params).map_err(|e| CliError::Argument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use caspolcheck::core::models::row::RowShape;
    use caspolcheck::engine::error::EngineError;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args(input: PathBuf) -> AsymptoticArgs {
        AsymptoticArgs {
            input,
            model: Some("pec-plate".into()),
            params: ModelOverrides::default(),
            reltol: None,
        }
    }

    #[test]
    fn averaged_table_is_validated() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("PECPlate.out");
        fs::write(&input, "# x y z U\n0 0 0.001 -1.38e7\n0 0 0.005 -8.0e4\n").unwrap();
        assert!(run(args(input)).unwrap());
    }

    #[test]
    fn crossover_only_table_fails_the_command() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("PECPlate.out");
        fs::write(&input, "0 0 0.005 -8.0e4\n").unwrap();
        assert!(!run(args(input)).unwrap());
    }

    #[test]
    fn per_frequency_table_is_a_shape_mismatch() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("PECPlate.byXi");
        fs::write(&input, "0 0 0.001 6.0 207.4813 -1.0e7\n").unwrap();
        assert!(matches!(
            run(args(input)),
            Err(CliError::Engine(EngineError::ShapeMismatch {
                expected: RowShape::Averaged,
                found: RowShape::Spectral
            }))
        ));
    }

    #[test]
    fn named_model_is_used_as_is() {
        let model = resolve_model(Some("pec-plate"), &ModelOverrides::default()).unwrap();
        assert_eq!(model, builtin_model("pec-plate").unwrap());
    }

    #[test]
    fn flags_override_the_named_model() {
        let overrides = ModelOverrides {
            long_threshold: Some(1.0),
            c_lr: Some(1.11e-3),
            ..Default::default()
        };
        let model = resolve_model(Some("pec-plate"), &overrides).unwrap();
        assert_eq!(model.long_threshold(), 1.0);
        assert_eq!(model.params().c_lr, 1.11e-3);
        assert_eq!(model.params().c_sr, 0.0138);
    }

    #[test]
    fn explicit_parameters_need_all_four_flags() {
        let overrides = ModelOverrides {
            short_threshold: Some(0.001),
            long_threshold: Some(0.02),
            c_sr: Some(0.0138),
            c_lr: None,
        };
        let err = resolve_model(None, &overrides).unwrap_err();
        assert!(matches!(err, CliError::Argument(msg) if msg.contains("--c-lr")));
    }

    #[test]
    fn invalid_thresholds_are_an_argument_error() {
        let overrides = ModelOverrides {
            short_threshold: Some(0.5),
            ..Default::default()
        };
        assert!(matches!(
            resolve_model(Some("pec-plate"), &overrides),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn unknown_model_lists_the_available_ones() {
        let err = resolve_model(Some("gold"), &ModelOverrides::default()).unwrap_err();
        assert!(matches!(err, CliError::Argument(msg) if msg.contains("pec-plate-far-field")));
    }
}
