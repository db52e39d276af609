use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "caspol-check - validates Casimir-Polder potentials computed by scuff-caspol against asymptotic laws, pre-verified reference values, and equivalent computations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a frequency-averaged (.out) table against short- and long-range asymptotes.
    Asymptotic(AsymptoticArgs),
    /// Check a per-frequency (.byXi) table against registered reference values.
    Regression(RegressionArgs),
    /// Check that per-frequency tables of equivalent geometry descriptions agree pairwise.
    Equivalence(EquivalenceArgs),
    /// Run a suite of scenarios, invoking the simulation tool as needed.
    Suite(SuiteArgs),
    /// List the built-in asymptotic models and reference geometries.
    Models,
}

/// Arguments for the `asymptotic` subcommand.
#[derive(Args, Debug)]
pub struct AsymptoticArgs {
    /// Path to the frequency-averaged output table.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Start from a built-in model (see `caspol-check models`).
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    #[command(flatten)]
    pub params: ModelOverrides,

    /// Relative tolerance (default: 0.01).
    #[arg(long, value_name = "FLOAT")]
    pub reltol: Option<f64>,
}

/// Model parameters; each one overrides the value taken from `--model`.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelOverrides {
    /// Upper distance bound of the short-range regime.
    #[arg(long, value_name = "FLOAT")]
    pub short_threshold: Option<f64>,

    /// Lower distance bound of the long-range regime.
    #[arg(long, value_name = "FLOAT")]
    pub long_threshold: Option<f64>,

    /// Short-range coefficient, U = -C_SR / z^3.
    #[arg(long, value_name = "FLOAT")]
    pub c_sr: Option<f64>,

    /// Long-range coefficient, U = -C_LR / z^4.
    #[arg(long, value_name = "FLOAT")]
    pub c_lr: Option<f64>,
}

/// Arguments for the `regression` subcommand.
#[derive(Args, Debug)]
pub struct RegressionArgs {
    /// Path to the per-frequency output table.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Geometry identifier the reference values are registered under (e.g. 'PECPlate').
    #[arg(short, long, required = true, value_name = "ID")]
    pub geometry: String,

    /// Only check rows at this frequency. Can be used multiple times.
    #[arg(long = "xi", value_name = "FLOAT")]
    pub frequencies: Vec<f64>,

    /// Additional reference values in CSV format, merged with the built-in ones.
    #[arg(short, long, value_name = "PATH")]
    pub references: Vec<PathBuf>,

    /// Relative tolerance (default: 0.1).
    #[arg(long, value_name = "FLOAT")]
    pub reltol: Option<f64>,
}

/// Arguments for the `equivalence` subcommand.
#[derive(Args, Debug)]
pub struct EquivalenceArgs {
    /// Per-frequency output tables of equivalent geometry descriptions.
    #[arg(required = true, num_args = 2.., value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Relative tolerance (default: 0.01).
    #[arg(long, value_name = "FLOAT")]
    pub reltol: Option<f64>,
}

/// Arguments for the `suite` subcommand.
#[derive(Args, Debug)]
pub struct SuiteArgs {
    /// Path to the suite file in TOML format. Without it, the standard suite is run.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding evaluation-point, frequency, and geometry files.
    /// Defaults to the directory of the suite file, or the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Directory for simulator output. Defaults to a temporary directory.
    #[arg(short, long, value_name = "PATH")]
    pub workdir: Option<PathBuf>,

    /// Keep the temporary working directory after the run.
    #[arg(long)]
    pub keep_workdir: bool,

    /// Override the simulation program.
    #[arg(long, value_name = "PATH")]
    pub program: Option<PathBuf>,

    /// Run only matching scenarios: a scenario name or 'tag:TAG'. Can be used multiple times.
    #[arg(long, value_name = "NAME|tag:TAG")]
    pub only: Vec<String>,

    /// Skip scenarios tagged 'slow'.
    #[arg(long)]
    pub skip_slow: bool,

    /// Set a specific configuration value, overriding the suite file.
    /// Can be used multiple times. Example: -S tolerances.default=0.05
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
