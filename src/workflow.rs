use crate::agents::{CommandOutcome, CommandRunner, ExtensionManagerAgent, VersionControlAgent};
use crate::config::{FailurePolicy, UpdaterConfig};
use crate::error::{Result, UpdaterError};
use crate::utils::{PathValidator, verbose};
use colored::Colorize;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Progress of a single run. Always advances in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UpdateStage {
    Start,
    Pulled,
    Refreshed,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Succeeded,
    Failed { reason: String },
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        matches!(self, StepResult::Succeeded)
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepResult::Succeeded => f.write_str("ok"),
            StepResult::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

/// What happened during a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub repository: PathBuf,
    pub pull: StepResult,
    pub refresh: StepResult,
    pub stage: UpdateStage,
}

impl UpdateReport {
    pub fn is_clean(&self) -> bool {
        self.pull.is_success() && self.refresh.is_success()
    }
}

/// Pull the extension repository and refresh the extension in pyRevit.
///
/// Status lines are written to `out`. A missing repository stops the run
/// before any command is started. Failing subcommands are handled according
/// to `config.failure_policy`.
pub fn execute_update(
    config: &UpdaterConfig,
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
) -> Result<UpdateReport> {
    let mut stage = UpdateStage::Start;
    verbose(format!("Stage: {stage:?}"));

    let repository = PathValidator::validate_repository_path(&config.repository_path)?;
    std::env::set_current_dir(&repository)?;
    verbose(format!("Working directory: {}", repository.display()));

    if !PathValidator::is_git_working_copy(&repository) {
        writeln!(
            out,
            "{}",
            format!(
                "⚠ Warning: '{}' is not a Git working copy",
                repository.display()
            )
            .yellow()
        )?;
    }

    let extension = config.extension_name.as_str();

    writeln!(
        out,
        "{}",
        format!("Pulling latest {extension} changes...").cyan().bold()
    )?;
    let pull_command = format!("{} pull", config.git_program);
    announce_dry_run(runner, &pull_command, &repository, out)?;
    let git = VersionControlAgent::new(runner, &config.git_program, &repository);
    let pull = finish_step(git.pull(), &pull_command, config.failure_policy, out)?;
    stage = advance(stage, UpdateStage::Pulled);

    writeln!(
        out,
        "{}",
        format!("Updating {extension} extension in pyRevit...").yellow()
    )?;
    let refresh_command = format!(
        "{} extensions update {extension}",
        config.extension_manager_program
    );
    announce_dry_run(runner, &refresh_command, &repository, out)?;
    let manager =
        ExtensionManagerAgent::new(runner, &config.extension_manager_program, &repository);
    let refresh = finish_step(
        manager.update_extension(extension),
        &refresh_command,
        config.failure_policy,
        out,
    )?;
    stage = advance(stage, UpdateStage::Refreshed);

    writeln!(
        out,
        "{}",
        format!("✨ {extension} is up-to-date!").green().bold()
    )?;
    stage = advance(stage, UpdateStage::Done);

    let report = UpdateReport {
        repository,
        pull,
        refresh,
        stage,
    };
    verbose(format!("Pull: {}", report.pull));
    verbose(format!("Refresh: {}", report.refresh));

    Ok(report)
}

fn announce_dry_run(
    runner: &dyn CommandRunner,
    command: &str,
    working_dir: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    if runner.is_dry_run() {
        writeln!(
            out,
            "   {} {} {}",
            "Would run:".dimmed(),
            command.bold(),
            format!("(in {})", working_dir.display()).dimmed()
        )?;
    }
    Ok(())
}

fn advance(from: UpdateStage, to: UpdateStage) -> UpdateStage {
    debug_assert!(to > from);
    verbose(format!("Stage: {from:?} -> {to:?}"));
    to
}

/// Echo a step's output and turn its outcome into a [`StepResult`].
///
/// Under [`FailurePolicy::Halt`] a failing or unstartable command becomes the
/// returned error; under `Continue` it is printed as a warning.
fn finish_step(
    result: Result<CommandOutcome>,
    command: &str,
    policy: FailurePolicy,
    out: &mut dyn Write,
) -> Result<StepResult> {
    let failure = match result {
        Ok(outcome) => {
            echo_output(&outcome, out)?;
            match outcome.ensure_success(command) {
                Ok(()) => return Ok(StepResult::Succeeded),
                Err(err) => err,
            }
        }
        Err(err @ UpdaterError::CommandSpawn { .. }) => err,
        Err(err) => return Err(err),
    };

    if policy == FailurePolicy::Halt {
        return Err(failure);
    }

    writeln!(out, "{}", format!("⚠ Warning: {failure}").red())?;
    Ok(StepResult::Failed {
        reason: failure.to_string(),
    })
}

fn echo_output(outcome: &CommandOutcome, out: &mut dyn Write) -> Result<()> {
    for line in outcome.stdout.lines().filter(|l| !l.trim().is_empty()) {
        writeln!(out, "   {line}")?;
    }
    for line in outcome.stderr.lines().filter(|l| !l.trim().is_empty()) {
        writeln!(out, "   {}", line.dimmed())?;
    }
    Ok(())
}
