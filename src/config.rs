use crate::error::{Result, UpdaterError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPOSITORY_PATH: &str = r"C:\pyRevit\Extensions\Huntcore.extension";
pub const DEFAULT_EXTENSION_NAME: &str = "Huntcore";
pub const DEFAULT_GIT_PROGRAM: &str = "git";
pub const DEFAULT_EXTENSION_MANAGER_PROGRAM: &str = "pyrevit";

/// What the updater does when `git pull` or the extension refresh fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report the failure and keep going; the run still ends with the
    /// up-to-date message.
    #[default]
    Continue,
    /// Stop at the first failing subcommand and exit non-zero.
    Halt,
}

/// Settings for one updater run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    pub repository_path: PathBuf,
    pub extension_name: String,
    pub git_program: String,
    pub extension_manager_program: String,
    pub failure_policy: FailurePolicy,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            repository_path: PathBuf::from(DEFAULT_REPOSITORY_PATH),
            extension_name: DEFAULT_EXTENSION_NAME.to_string(),
            git_program: DEFAULT_GIT_PROGRAM.to_string(),
            extension_manager_program: DEFAULT_EXTENSION_MANAGER_PROGRAM.to_string(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// On-disk layout of the optional config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    repository_path: Option<PathBuf>,
    extension_name: Option<String>,
    git_program: Option<String>,
    extension_manager_program: Option<String>,
    failure_policy: Option<FailurePolicy>,
}

/// Values supplied on the command line; they win over the config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub repository_path: Option<PathBuf>,
    pub extension_name: Option<String>,
    pub git_program: Option<String>,
    pub extension_manager_program: Option<String>,
    pub strict: bool,
}

impl UpdaterConfig {
    /// Load configuration with layering: defaults → config file → CLI overrides.
    pub fn load(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    UpdaterError::Config(format!(
                        "Failed to read config file '{}': {e}",
                        path.display()
                    ))
                })?;
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parses a config file body on top of the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        let mut config = Self::default();

        if let Some(path) = file.repository_path {
            config.repository_path = path;
        }
        if let Some(name) = file.extension_name {
            config.extension_name = name;
        }
        if let Some(program) = file.git_program {
            config.git_program = program;
        }
        if let Some(program) = file.extension_manager_program {
            config.extension_manager_program = program;
        }
        if let Some(policy) = file.failure_policy {
            config.failure_policy = policy;
        }

        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.repository_path {
            self.repository_path = path;
        }
        if let Some(name) = overrides.extension_name {
            self.extension_name = name;
        }
        if let Some(program) = overrides.git_program {
            self.git_program = program;
        }
        if let Some(program) = overrides.extension_manager_program {
            self.extension_manager_program = program;
        }
        if overrides.strict {
            self.failure_policy = FailurePolicy::Halt;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.repository_path.as_os_str().is_empty() {
            return Err(UpdaterError::Config(
                "repository_path must not be empty".to_string(),
            ));
        }

        let name = self.extension_name.trim();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(UpdaterError::Config(format!(
                "Invalid extension name '{}'",
                self.extension_name
            )));
        }

        for (key, program) in [
            ("git_program", &self.git_program),
            ("extension_manager_program", &self.extension_manager_program),
        ] {
            if program.trim().is_empty() {
                return Err(UpdaterError::Config(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_huntcore_install() {
        let config = UpdaterConfig::default();
        assert_eq!(config.extension_name, "Huntcore");
        assert_eq!(config.git_program, "git");
        assert_eq!(config.extension_manager_program, "pyrevit");
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert!(
            config
                .repository_path
                .to_string_lossy()
                .ends_with("Huntcore.extension")
        );
    }

    #[test]
    fn file_values_overlay_defaults() {
        let config = UpdaterConfig::from_toml_str(
            r#"
repository_path = "/srv/extensions/Huntcore.extension"
failure_policy = "halt"
"#,
        )
        .unwrap();

        assert_eq!(
            config.repository_path,
            PathBuf::from("/srv/extensions/Huntcore.extension")
        );
        assert_eq!(config.failure_policy, FailurePolicy::Halt);
        assert_eq!(config.extension_name, DEFAULT_EXTENSION_NAME);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = UpdaterConfig::from_toml_str("extension = \"Huntcore\"").unwrap_err();
        assert!(matches!(err, UpdaterError::Toml(_)));
    }

    #[test]
    fn cli_overrides_win_over_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("huntcore.toml");
        fs::write(
            &path,
            "extension_name = \"FromFile\"\ngit_program = \"/usr/bin/git\"\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            extension_name: Some("FromCli".to_string()),
            strict: true,
            ..Default::default()
        };
        let config = UpdaterConfig::load(Some(&path), overrides).unwrap();

        assert_eq!(config.extension_name, "FromCli");
        assert_eq!(config.git_program, "/usr/bin/git");
        assert_eq!(config.failure_policy, FailurePolicy::Halt);
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let err = UpdaterConfig::load(
            Some(&dir.path().join("absent.toml")),
            ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UpdaterError::Config(_)));
    }

    #[test]
    fn rejects_extension_name_with_whitespace() {
        let overrides = ConfigOverrides {
            extension_name: Some("Hunt core".to_string()),
            ..Default::default()
        };
        let err = UpdaterConfig::load(None, overrides).unwrap_err();
        assert!(matches!(err, UpdaterError::Config(_)));
    }

    #[test]
    fn rejects_blank_program() {
        let overrides = ConfigOverrides {
            git_program: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(UpdaterConfig::load(None, overrides).is_err());
    }
}
