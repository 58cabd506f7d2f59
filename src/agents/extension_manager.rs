use crate::agents::command_runner::{CommandOutcome, CommandRunner, Invocation};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// ExtensionManagerAgent drives the host application's extension CLI
/// (`pyrevit extensions ...`).
pub struct ExtensionManagerAgent<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
    working_dir: PathBuf,
}

impl<'a> ExtensionManagerAgent<'a> {
    pub fn new<P: AsRef<Path>>(
        runner: &'a dyn CommandRunner,
        program: impl Into<String>,
        working_dir: P,
    ) -> Self {
        Self {
            runner,
            program: program.into(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    /// Ask the extension manager to re-scan and reload `extension`.
    pub fn update_extension(&self, extension: &str) -> Result<CommandOutcome> {
        self.runner.run(&self.update_invocation(extension))
    }

    fn update_invocation(&self, extension: &str) -> Invocation {
        Invocation::new(&self.program, &self.working_dir)
            .arg("extensions")
            .arg("update")
            .arg(extension)
    }
}
