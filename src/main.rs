mod agents;
mod cli;
mod config;
mod error;
mod utils;
mod workflow;

use agents::{CommandRunner, DryRunRunner, SystemCommandRunner};
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::UpdaterConfig;
use std::io;
use std::process;
use utils::diagnostics::VERBOSE_ENV;
use workflow::UpdateReport;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var(VERBOSE_ENV, "1");
        }
    }

    let result = run(&cli);
    if let Err(e) = &result {
        eprintln!("{} {}", "Error:".red().bold(), e);
    }
    process::exit(exit_code(&result));
}

/// A finished run exits 0 even when a step failed under the `continue`
/// policy; only errors that stopped the run exit 1.
fn exit_code(result: &error::Result<UpdateReport>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn run(cli: &Cli) -> error::Result<UpdateReport> {
    let config = UpdaterConfig::load(cli.config.as_deref(), cli.overrides())?;
    utils::verbose(format!("Configuration: {config:?}"));

    let runner: Box<dyn CommandRunner> = if cli.dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(SystemCommandRunner)
    };

    let mut stdout = io::stdout().lock();
    let report = workflow::execute_update(&config, runner.as_ref(), &mut stdout)?;
    utils::verbose(format!(
        "Reached {:?} for {}",
        report.stage,
        report.repository.display()
    ));
    if !report.is_clean() {
        utils::verbose("Finished with subcommand failures (see warnings above)");
    }
    Ok(report)
}
