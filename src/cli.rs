use crate::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "huntcore-update",
    about = "Pull the Huntcore extension repository and refresh it in pyRevit",
    version,
    author
)]
pub struct Cli {
    /// Path to the extension's Git working copy
    #[arg(short, long, value_name = "PATH")]
    pub repository: Option<PathBuf>,

    /// Name of the extension to refresh in pyRevit
    #[arg(short, long, value_name = "NAME")]
    pub extension: Option<String>,

    /// Git executable to run
    #[arg(long, value_name = "PROGRAM")]
    pub git: Option<String>,

    /// Extension manager executable to run (pyrevit CLI)
    #[arg(long = "extension-manager", value_name = "PROGRAM")]
    pub extension_manager: Option<String>,

    /// Load settings from a TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stop and exit non-zero when git or pyrevit fails
    #[arg(long)]
    pub strict: bool,

    /// Print the commands that would run without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            repository_path: self.repository.clone(),
            extension_name: self.extension.clone(),
            git_program: self.git.clone(),
            extension_manager_program: self.extension_manager.clone(),
            strict: self.strict,
        }
    }
}
