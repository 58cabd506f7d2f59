use crate::agents::command_runner::{CommandOutcome, CommandRunner, Invocation};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// VersionControlAgent runs Git against the extension working copy.
pub struct VersionControlAgent<'a> {
    runner: &'a dyn CommandRunner,
    git_program: String,
    repository_path: PathBuf,
}

impl<'a> VersionControlAgent<'a> {
    pub fn new<P: AsRef<Path>>(
        runner: &'a dyn CommandRunner,
        git_program: impl Into<String>,
        repository_path: P,
    ) -> Self {
        Self {
            runner,
            git_program: git_program.into(),
            repository_path: repository_path.as_ref().to_path_buf(),
        }
    }

    /// Pull the tracked remote branch into the working copy.
    ///
    /// The outcome is returned as-is; deciding what a non-zero exit means is
    /// left to the caller.
    pub fn pull(&self) -> Result<CommandOutcome> {
        self.run_git(&["pull"])
    }

    fn run_git(&self, args: &[&str]) -> Result<CommandOutcome> {
        self.runner.run(&self.invocation(args))
    }

    fn invocation(&self, args: &[&str]) -> Invocation {
        args.iter().fold(
            Invocation::new(&self.git_program, &self.repository_path),
            |invocation, arg| invocation.arg(*arg),
        )
    }
}
