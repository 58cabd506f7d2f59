use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("Repository path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Repository path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("'{command}' failed with exit code: {}", describe_code(.code))]
    SubprocessFailure { command: String, code: Option<i32> },

    #[error("Failed to execute '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, UpdaterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subprocess_failure_message_shows_exit_code() {
        let err = UpdaterError::SubprocessFailure {
            command: "git pull".to_string(),
            code: Some(128),
        };
        assert_eq!(err.to_string(), "'git pull' failed with exit code: 128");

        let killed = UpdaterError::SubprocessFailure {
            command: "git pull".to_string(),
            code: None,
        };
        assert!(killed.to_string().ends_with("none (terminated by signal)"));
    }
}
