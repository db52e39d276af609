use crate::cli::SuiteArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::report;
use crate::utils::progress::CliProgressHandler;
use caspolcheck::engine::cache::ComputationCache;
use caspolcheck::engine::external::CommandSimulator;
use caspolcheck::engine::progress::ProgressReporter;
use caspolcheck::workflows;
use std::fs;
use tracing::info;

pub fn run(args: SuiteArgs) -> Result<bool> {
    let app = build_config(&args)?;
    info!(
        "Configured {} scenario(s) with data from {:?}",
        app.validation.scenarios.len(),
        app.data_dir
    );

    let (workdir, temp_dir) = match &args.workdir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            (dir.clone(), None)
        }
        None => {
            let temp_dir = tempfile::Builder::new()
                .prefix("caspol-check-")
                .disable_cleanup(args.keep_workdir)
                .tempdir()?;
            (temp_dir.path().to_path_buf(), Some(temp_dir))
        }
    };
    info!("Simulator output goes to {:?}", workdir);

    let simulator = CommandSimulator::new(&app.program);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut cache = ComputationCache::new();

    println!(
        "Running {} scenario(s) with {}...",
        app.validation.scenarios.len(),
        simulator.program().display()
    );
    let suite_report =
        workflows::validate::run(&app.validation, &simulator, &workdir, &mut cache, &reporter);

    report::print_suite(&suite_report)?;
    if temp_dir.is_some() && args.keep_workdir {
        println!("Working files kept in {}", workdir.display());
    }
    drop(temp_dir);

    Ok(suite_report.passed())
}
