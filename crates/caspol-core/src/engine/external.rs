use super::error::EngineError;
use crate::core::io::output::OutputKind;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub const DEFAULT_PROGRAM: &str = "scuff-caspol";
pub const DEFAULT_ATOM: &str = "Rubidium";
pub const PEC_PLATE_ID: &str = "PECPlate";

/// How the tool is told which body to put next to the atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometrySelector {
    /// The tool's built-in perfectly conducting half space.
    PecPlate,
    /// A `.scuffgeo` geometry description file.
    File(PathBuf),
}

/// How the tool is told which imaginary frequencies to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrequencySelector {
    /// A file listing one frequency per line.
    List(PathBuf),
    /// A single frequency.
    Single(f64),
    /// Matsubara sum at the given temperature; also produces the averaged `.out` table.
    Temperature(f64),
}

/// One run of the external simulation tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Invocation {
    pub evaluation_points: PathBuf,
    pub atom: String,
    pub geometry: GeometrySelector,
    pub frequency: FrequencySelector,
}

impl Invocation {
    /// The name the tool gives its output files.
    pub fn geometry_id(&self) -> String {
        match &self.geometry {
            GeometrySelector::PecPlate => PEC_PLATE_ID.to_string(),
            GeometrySelector::File(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    pub fn produces_averaged_output(&self) -> bool {
        matches!(self.frequency, FrequencySelector::Temperature(_))
    }

    /// Command-line flags, in the order the tool documents them.
    pub fn arguments(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--EPFile".into(),
            self.evaluation_points.clone().into(),
            "--atom".into(),
            self.atom.clone().into(),
        ];
        match &self.geometry {
            GeometrySelector::PecPlate => args.push("--PECPlate".into()),
            GeometrySelector::File(path) => {
                args.push("--geometry".into());
                args.push(path.clone().into());
            }
        }
        match &self.frequency {
            FrequencySelector::List(path) => {
                args.push("--XiFile".into());
                args.push(path.clone().into());
            }
            FrequencySelector::Single(xi) => {
                args.push("--Xi".into());
                args.push(xi.to_string().into());
            }
            FrequencySelector::Temperature(t) => {
                args.push("--Temperature".into());
                args.push(t.to_string().into());
            }
        }
        args
    }

    /// A stable textual form of the invocation; equal keys mean identical runs.
    pub fn canonical_key(&self) -> String {
        let geometry = match &self.geometry {
            GeometrySelector::PecPlate => "pec-plate".to_string(),
            GeometrySelector::File(path) => format!("file:{}", path.display()),
        };
        let frequency = match &self.frequency {
            FrequencySelector::List(path) => format!("list:{}", path.display()),
            FrequencySelector::Single(xi) => format!("single:{xi:e}"),
            FrequencySelector::Temperature(t) => format!("temperature:{t:e}"),
        };
        format!(
            "atom={};evaluation-points={};geometry={};frequency={}",
            self.atom,
            self.evaluation_points.display(),
            geometry,
            frequency
        )
    }

    pub fn expected_outputs(&self, workdir: &Path) -> ProducedOutputs {
        let id = self.geometry_id();
        ProducedOutputs {
            by_xi: workdir.join(OutputKind::ByXi.file_name(&id)),
            averaged: self
                .produces_averaged_output()
                .then(|| workdir.join(OutputKind::Averaged.file_name(&id))),
        }
    }

    pub fn display_command(&self, program: &Path) -> String {
        let mut parts = vec![program.display().to_string()];
        parts.extend(
            self.arguments()
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}

/// Paths of the tables one run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedOutputs {
    pub by_xi: PathBuf,
    pub averaged: Option<PathBuf>,
}

impl ProducedOutputs {
    /// Fails unless every table the run promised exists on disk.
    pub fn ensure_exist(&self, command: &str) -> Result<(), EngineError> {
        for path in std::iter::once(&self.by_xi).chain(self.averaged.as_ref()) {
            if !path.is_file() {
                return Err(EngineError::ExternalComputationFailed {
                    command: command.to_string(),
                    reason: format!("expected output file '{}' was not produced", path.display()),
                });
            }
        }
        Ok(())
    }
}

/// The collaborator that actually runs simulations.
///
/// Implementations block until the computation has finished and its files are in `workdir`.
pub trait Simulator {
    fn run(&self, invocation: &Invocation, workdir: &Path) -> Result<ProducedOutputs, EngineError>;

    /// Human-readable command line, used in logs and error messages.
    fn describe(&self, invocation: &Invocation) -> String;
}

/// Runs the simulation tool as a child process.
#[derive(Debug, Clone)]
pub struct CommandSimulator {
    program: PathBuf,
}

impl Default for CommandSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl CommandSimulator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

const STDERR_TAIL_LINES: usize = 5;

impl Simulator for CommandSimulator {
    fn run(&self, invocation: &Invocation, workdir: &Path) -> Result<ProducedOutputs, EngineError> {
        let command = self.describe(invocation);
        info!("Running `{}` in {:?}", command, workdir);

        let output = Command::new(&self.program)
            .args(invocation.arguments())
            .current_dir(workdir)
            .output()
            .map_err(|e| EngineError::ExternalComputationFailed {
                command: command.clone(),
                reason: format!("failed to start: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            return Err(EngineError::ExternalComputationFailed {
                command,
                reason: if tail.is_empty() {
                    format!("{}", output.status)
                } else {
                    format!("{}: {}", output.status, tail)
                },
            });
        }
        debug!("`{}` finished with {}", command, output.status);

        let produced = invocation.expected_outputs(workdir);
        produced.ensure_exist(&command)?;
        Ok(produced)
    }

    fn describe(&self, invocation: &Invocation) -> String {
        invocation.display_command(&self.program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn tetrahedron() -> Invocation {
        Invocation {
            evaluation_points: "dist.txt".into(),
            atom: DEFAULT_ATOM.into(),
            geometry: GeometrySelector::File("tetrahedron_pec_6.scuffgeo".into()),
            frequency: FrequencySelector::List("freq.txt".into()),
        }
    }

    fn plate_at(temperature: f64) -> Invocation {
        Invocation {
            evaluation_points: "distvalidate.txt".into(),
            atom: DEFAULT_ATOM.into(),
            geometry: GeometrySelector::PecPlate,
            frequency: FrequencySelector::Temperature(temperature),
        }
    }

    #[test]
    fn arguments_follow_tool_flag_layout() {
        let args: Vec<String> = tetrahedron()
            .arguments()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--EPFile",
                "dist.txt",
                "--atom",
                "Rubidium",
                "--geometry",
                "tetrahedron_pec_6.scuffgeo",
                "--XiFile",
                "freq.txt"
            ]
        );

        let plate = plate_at(1.0).display_command(Path::new("scuff-caspol"));
        assert_eq!(
            plate,
            "scuff-caspol --EPFile distvalidate.txt --atom Rubidium --PECPlate --Temperature 1"
        );
    }

    #[test]
    fn geometry_id_names_output_files() {
        assert_eq!(tetrahedron().geometry_id(), "tetrahedron_pec_6");
        assert_eq!(plate_at(1.0).geometry_id(), "PECPlate");

        let outputs = plate_at(1.0).expected_outputs(Path::new("/work"));
        assert_eq!(outputs.by_xi, PathBuf::from("/work/PECPlate.byXi"));
        assert_eq!(outputs.averaged, Some(PathBuf::from("/work/PECPlate.out")));
        assert_eq!(
            tetrahedron().expected_outputs(Path::new("/work")).averaged,
            None
        );
    }

    #[test]
    fn canonical_key_distinguishes_configurations() {
        assert_eq!(tetrahedron().canonical_key(), tetrahedron().canonical_key());
        assert_ne!(plate_at(1.0).canonical_key(), plate_at(2.0).canonical_key());

        let mut single = tetrahedron();
        single.frequency = FrequencySelector::Single(6.0);
        assert_ne!(single.canonical_key(), tetrahedron().canonical_key());
    }

    #[test]
    fn invocation_deserializes_from_kebab_case_toml() {
        let invocation: Invocation = toml::from_str(
            r#"
            evaluation-points = "dist.txt"
            atom = "Rubidium"
            geometry = { file = "coin_pec_144.scuffgeo" }
            frequency = { single = 6.0 }
            "#,
        )
        .unwrap();
        assert_eq!(
            invocation.geometry,
            GeometrySelector::File("coin_pec_144.scuffgeo".into())
        );
        assert_eq!(invocation.frequency, FrequencySelector::Single(6.0));

        let plate: Invocation = toml::from_str(
            r#"
            evaluation-points = "distvalidate.txt"
            atom = "Rubidium"
            geometry = "pec-plate"
            frequency = { temperature = 1.0 }
            "#,
        )
        .unwrap();
        assert_eq!(plate, plate_at(1.0));
    }

    #[test]
    fn ensure_exist_reports_missing_output() {
        let dir = tempdir().unwrap();
        let outputs = plate_at(1.0).expected_outputs(dir.path());
        std::fs::write(&outputs.by_xi, "").unwrap();

        let err = outputs.ensure_exist("scuff-caspol").unwrap_err();
        match err {
            EngineError::ExternalComputationFailed { reason, .. } => {
                assert!(reason.contains("PECPlate.out"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        std::fs::write(outputs.averaged.as_ref().unwrap(), "").unwrap();
        assert!(outputs.ensure_exist("scuff-caspol").is_ok());
    }

    #[test]
    #[serial]
    fn missing_program_is_an_external_failure() {
        let dir = tempdir().unwrap();
        let simulator = CommandSimulator::new(dir.path().join("no-such-binary"));
        let err = simulator.run(&tetrahedron(), dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::ExternalComputationFailed { .. }));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-caspol.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[test]
        #[serial]
        fn successful_run_returns_produced_files() {
            let dir = tempdir().unwrap();
            let program = script(dir.path(), "touch PECPlate.byXi PECPlate.out");
            let simulator = CommandSimulator::new(program);

            let produced = simulator.run(&plate_at(1.0), dir.path()).unwrap();
            assert!(produced.by_xi.is_file());
            assert!(produced.averaged.unwrap().is_file());
        }

        #[test]
        #[serial]
        fn nonzero_exit_fails_before_outputs_are_inspected() {
            let dir = tempdir().unwrap();
            let program = script(
                dir.path(),
                "touch PECPlate.byXi PECPlate.out\necho 'mesh not found' >&2\nexit 3",
            );
            let simulator = CommandSimulator::new(program);

            let err = simulator.run(&plate_at(1.0), dir.path()).unwrap_err();
            match err {
                EngineError::ExternalComputationFailed { reason, .. } => {
                    assert!(reason.contains("mesh not found"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        #[serial]
        fn clean_exit_without_outputs_is_still_a_failure() {
            let dir = tempdir().unwrap();
            let program = script(dir.path(), "exit 0");
            let simulator = CommandSimulator::new(program);

            let err = simulator.run(&tetrahedron(), dir.path()).unwrap_err();
            assert!(matches!(err, EngineError::ExternalComputationFailed { .. }));
        }
    }
}
