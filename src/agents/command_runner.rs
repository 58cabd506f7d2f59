use crate::error::{Result, UpdaterError};
use crate::utils::diagnostics::{self, verbose};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// A single external command: program, arguments and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, working_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Exit code and captured output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn succeeded() -> Self {
        Self {
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn ensure_success(&self, command: &str) -> Result<()> {
        if self.success() {
            return Ok(());
        }

        Err(UpdaterError::SubprocessFailure {
            command: command.to_string(),
            code: self.code,
        })
    }
}

/// Executes external commands on behalf of the agents.
///
/// Each call blocks until the command exits.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutcome>;

    /// True when commands are only announced, never spawned.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Runs commands as real child processes, showing a spinner while they work.
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
        verbose(format!(
            "Executing: {} (in {})",
            invocation,
            invocation.working_dir.display()
        ));

        let spinner = ProgressBar::new_spinner();
        if diagnostics::is_verbose() {
            spinner.set_draw_target(ProgressDrawTarget::hidden());
        }
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("   {spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(invocation.command_line().dimmed().to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        // stdin stays attached for git credential prompts; the spinner can
        // draw over such a prompt, --verbose hides it
        let output = Command::new(&invocation.program)
            .current_dir(&invocation.working_dir)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .output();

        spinner.finish_and_clear();

        let output = output.map_err(|source| UpdaterError::CommandSpawn {
            command: invocation.command_line(),
            source,
        })?;

        let outcome = CommandOutcome {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        verbose(format!("'{}' exited with {:?}", invocation, outcome.code));

        Ok(outcome)
    }
}

/// Reports success without spawning anything. The workflow prints what
/// would have run.
#[derive(Debug, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
        verbose(format!("Skipping '{invocation}' (dry run)"));
        Ok(CommandOutcome::succeeded())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn command_line_joins_program_and_args() {
        let invocation = Invocation::new("pyrevit", "/tmp")
            .arg("extensions")
            .arg("update")
            .arg("Huntcore");
        assert_eq!(invocation.command_line(), "pyrevit extensions update Huntcore");
        assert_eq!(invocation.to_string(), invocation.command_line());
    }

    #[test]
    fn ensure_success_reports_exit_code() {
        let outcome = CommandOutcome {
            code: Some(1),
            ..Default::default()
        };
        let err = outcome.ensure_success("git pull").unwrap_err();
        assert!(matches!(
            err,
            UpdaterError::SubprocessFailure { ref command, code: Some(1) } if command == "git pull"
        ));
        assert!(CommandOutcome::succeeded().ensure_success("git pull").is_ok());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = tempdir().unwrap();
        let invocation = Invocation::new("huntcore-no-such-program", dir.path());
        let err = SystemCommandRunner.run(&invocation).unwrap_err();
        assert!(matches!(err, UpdaterError::CommandSpawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn captures_exit_code_and_output() {
        let dir = tempdir().unwrap();
        let invocation = Invocation::new("sh", dir.path())
            .arg("-c")
            .arg("echo pulled; echo warn >&2; exit 3");
        let outcome = SystemCommandRunner.run(&invocation).unwrap();
        assert_eq!(outcome.code, Some(3));
        assert_eq!(outcome.stdout.trim(), "pulled");
        assert_eq!(outcome.stderr.trim(), "warn");
        assert!(!outcome.success());
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_working_dir() {
        let dir = tempdir().unwrap();
        let invocation = Invocation::new("sh", dir.path()).arg("-c").arg("pwd -P");
        let outcome = SystemCommandRunner.run(&invocation).unwrap();
        assert_eq!(
            dunce::canonicalize(outcome.stdout.trim()).unwrap(),
            dunce::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn dry_run_always_succeeds() {
        let invocation = Invocation::new("huntcore-no-such-program", "/");
        assert!(DryRunRunner.run(&invocation).unwrap().success());
        assert!(DryRunRunner.is_dry_run());
        assert!(!SystemCommandRunner.is_dry_run());
    }
}
