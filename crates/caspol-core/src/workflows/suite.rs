use crate::core::catalog::builtin_model;
use crate::core::numerics::tolerance::Tolerances;
use crate::core::reference::table::ReferenceTable;
use crate::engine::config::{
    ConfigError, FrequencySelection, ScenarioCheck, ScenarioSpec, ValidationConfig,
    ValidationConfigBuilder,
};
use crate::engine::external::{DEFAULT_ATOM, FrequencySelector, GeometrySelector, Invocation};
use std::collections::BTreeSet;
use std::path::Path;

pub const TAG_FAST: &str = "fast";
pub const TAG_SLOW: &str = "slow";
pub const TAG_VALIDATION: &str = "validation";

const FREQUENCY_FILE: &str = "freq.txt";
const REFERENCE_POINTS_FILE: &str = "dist.txt";
const ASYMPTOTIC_POINTS_FILE: &str = "distvalidate.txt";

const XI_STATIC: f64 = 1.0e-6;
const XI_OPTICAL: f64 = 6.0;
const TEMPERATURE: f64 = 1.0;
const PLATE_MODEL: &str = "pec-plate";

struct Fixtures<'a> {
    data_dir: &'a Path,
}

impl Fixtures<'_> {
    fn invocation(
        &self,
        points: &str,
        geometry: GeometrySelector,
        frequency: FrequencySelector,
    ) -> Invocation {
        Invocation {
            evaluation_points: self.data_dir.join(points),
            atom: DEFAULT_ATOM.to_string(),
            geometry,
            frequency,
        }
    }

    fn geometry_file(&self, name: &str) -> GeometrySelector {
        GeometrySelector::File(self.data_dir.join(name))
    }

    fn frequency_list(&self) -> FrequencySelector {
        FrequencySelector::List(self.data_dir.join(FREQUENCY_FILE))
    }

    fn reference(
        &self,
        name: &str,
        tag: &str,
        geometry: GeometrySelector,
        frequency: FrequencySelector,
        xi: f64,
    ) -> ScenarioSpec {
        let invocation = self.invocation(REFERENCE_POINTS_FILE, geometry, frequency);
        ScenarioSpec {
            name: name.to_string(),
            tags: tags(&[tag]),
            check: ScenarioCheck::Reference {
                geometry: invocation.geometry_id(),
                frequencies: FrequencySelection::Only(vec![xi]),
            },
            invocation,
            reltol: None,
        }
    }

    fn asymptotic(
        &self,
        name: &str,
        geometry: GeometrySelector,
    ) -> Result<ScenarioSpec, ConfigError> {
        let model = builtin_model(PLATE_MODEL).ok_or_else(|| ConfigError::InvalidScenario {
            scenario: name.to_string(),
            reason: format!("built-in model '{PLATE_MODEL}' is unavailable"),
        })?;
        Ok(ScenarioSpec {
            name: name.to_string(),
            tags: tags(&[TAG_VALIDATION]),
            invocation: self.invocation(
                ASYMPTOTIC_POINTS_FILE,
                geometry,
                FrequencySelector::Temperature(TEMPERATURE),
            ),
            check: ScenarioCheck::Asymptotic { model },
            reltol: None,
        })
    }
}

fn tags(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// The historical scuff-caspol regression and validation scenarios.
///
/// Every path points into `data_dir`, which must hold `freq.txt`, `dist.txt`,
/// `distvalidate.txt`, and the `.scuffgeo` geometries (with their meshes).
pub fn standard_suite(data_dir: &Path) -> Result<Vec<ScenarioSpec>, ConfigError> {
    let fx = Fixtures { data_dir };
    let single = || FrequencySelector::Single(XI_OPTICAL);

    let mut scenarios = vec![
        fx.reference(
            "infinite-plate-xi0",
            TAG_FAST,
            GeometrySelector::PecPlate,
            fx.frequency_list(),
            XI_STATIC,
        ),
        fx.reference(
            "infinite-plate-xi6",
            TAG_FAST,
            GeometrySelector::PecPlate,
            fx.frequency_list(),
            XI_OPTICAL,
        ),
        fx.reference(
            "tetrahedron-pec-xi0",
            TAG_FAST,
            fx.geometry_file("tetrahedron_pec_6.scuffgeo"),
            fx.frequency_list(),
            XI_STATIC,
        ),
        fx.reference(
            "tetrahedron-pec-xi6",
            TAG_FAST,
            fx.geometry_file("tetrahedron_pec_6.scuffgeo"),
            fx.frequency_list(),
            XI_OPTICAL,
        ),
        fx.reference(
            "tetrahedron-eps10-xi6",
            TAG_FAST,
            fx.geometry_file("tetrahedron_eps10_6.scuffgeo"),
            single(),
            XI_OPTICAL,
        ),
        fx.reference(
            "coin-xi0",
            TAG_SLOW,
            fx.geometry_file("coin_pec_144.scuffgeo"),
            fx.frequency_list(),
            XI_STATIC,
        ),
        fx.reference(
            "coin-xi6",
            TAG_SLOW,
            fx.geometry_file("coin_pec_144.scuffgeo"),
            fx.frequency_list(),
            XI_OPTICAL,
        ),
        fx.asymptotic("pec-plate-asymptotics", GeometrySelector::PecPlate)?,
        fx.asymptotic(
            "thin-plate-asymptotics",
            fx.geometry_file("thinplate_pec.scuffgeo"),
        )?,
    ];

    let variant =
        |file: &str| fx.invocation(REFERENCE_POINTS_FILE, fx.geometry_file(file), single());
    scenarios.push(ScenarioSpec {
        name: "tetrahedron-eps10-material-equivalence".to_string(),
        tags: tags(&[TAG_VALIDATION]),
        invocation: variant("tetrahedron_eps10_6.scuffgeo"),
        check: ScenarioCheck::Equivalence {
            alternates: vec![
                variant("tetrahedron_eps10_func_6.scuffgeo"),
                variant("tetrahedron_eps10_file_6.scuffgeo"),
            ],
        },
        reltol: None,
    });

    Ok(scenarios)
}

/// The standard suite with built-in references and default tolerances.
pub fn standard_config(data_dir: &Path) -> Result<ValidationConfig, ConfigError> {
    ValidationConfigBuilder::new()
        .tolerances(Tolerances::default())
        .references(ReferenceTable::builtin())
        .scenarios(standard_suite(data_dir)?)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_config_builds_and_validates() {
        let config = standard_config(Path::new("/data")).unwrap();
        assert_eq!(config.scenarios.len(), 10);
    }

    #[test]
    fn reference_scenarios_are_checked_against_their_own_geometry() {
        let scenarios = standard_suite(Path::new("/data")).unwrap();
        let tetra = scenarios
            .iter()
            .find(|s| s.name == "tetrahedron-pec-xi6")
            .unwrap();
        assert_eq!(
            tetra.check,
            ScenarioCheck::Reference {
                geometry: "tetrahedron_pec_6".into(),
                frequencies: FrequencySelection::Only(vec![6.0]),
            }
        );
        assert_eq!(
            tetra.invocation.evaluation_points,
            Path::new("/data/dist.txt")
        );
    }

    #[test]
    fn paired_frequency_scenarios_share_one_invocation() {
        let scenarios = standard_suite(Path::new("/data")).unwrap();
        let keys: HashSet<_> = scenarios
            .iter()
            .filter(|s| matches!(s.check, ScenarioCheck::Reference { .. }))
            .map(|s| s.invocation.canonical_key())
            .collect();
        // plate, tetrahedron, eps10, coin
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn slow_scenarios_are_tagged() {
        let scenarios = standard_suite(Path::new("/data")).unwrap();
        let slow: Vec<_> = scenarios
            .iter()
            .filter(|s| s.has_tag(TAG_SLOW))
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(slow, ["coin-xi0", "coin-xi6"]);
        assert!(
            scenarios
                .iter()
                .all(|s| [TAG_FAST, TAG_SLOW, TAG_VALIDATION].iter().any(|t| s.has_tag(t)))
        );
    }
}
