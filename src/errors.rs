//! Typed error definitions for move_files.
//! Provides a small set of well-known failure modes for better logs and tests.
//!
//! Only run-fatal conditions live here. Per-entry failures during traversal are
//! reported as `MoveOutcome` values by the engine and never abort a run.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::share::ShareRole;

/// One problem found while validating a configuration section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// Required key absent from both the chosen section and DEFAULT.
    Missing(&'static str),
    /// Required key present but blank.
    Empty(&'static str),
    /// `batch_size` is not an integer.
    BatchSizeNotInteger(String),
    /// A connect flag is not a recognised boolean.
    NotBoolean { key: &'static str, value: String },
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::Missing(key) => write!(f, "the value of '{key}' is missing"),
            ConfigIssue::Empty(key) => write!(f, "the value of '{key}' cannot be empty"),
            ConfigIssue::BatchSizeNotInteger(v) => {
                write!(f, "'batch_size' must be an integer (got '{v}')")
            }
            ConfigIssue::NotBoolean { key, value } => {
                write!(f, "'{key}' must be true or false (got '{value}')")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum MoveFilesError {
    #[error("invalid configuration in section [{section}]: {}", join_issues(.issues))]
    InvalidConfig {
        section: String,
        issues: Vec<ConfigIssue>,
    },

    #[error("configuration section [{0}] not found")]
    UnknownSection(String),

    #[error("cannot read configuration file {path}: {detail}")]
    ConfigRead { path: PathBuf, detail: String },

    #[error("cannot connect the {role} share: {detail}")]
    ConnectFailed { role: ShareRole, detail: String },

    #[error("cannot disconnect the {role} share: {detail}; disconnect it manually")]
    DisconnectFailed { role: ShareRole, detail: String },

    #[error("source path is not a usable directory: {0}")]
    SourceInvalid(PathBuf),

    #[error("target path is not a usable directory: {0}")]
    TargetInvalid(PathBuf),

    #[error("source '{source_path}' and target '{target_path}' overlap")]
    OverlappingPaths {
        source_path: PathBuf,
        target_path: PathBuf,
    },
}

impl MoveFilesError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            MoveFilesError::InvalidConfig { .. } => 10,
            MoveFilesError::UnknownSection(_) => 11,
            MoveFilesError::ConfigRead { .. } => 12,
            MoveFilesError::ConnectFailed { .. } => 20,
            MoveFilesError::DisconnectFailed { .. } => 21,
            MoveFilesError::SourceInvalid(_) => 30,
            MoveFilesError::TargetInvalid(_) => 31,
            MoveFilesError::OverlappingPaths { .. } => 32,
        }
    }
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_lists_every_issue() {
        let err = MoveFilesError::InvalidConfig {
            section: "DEFAULT".into(),
            issues: vec![
                ConfigIssue::Missing("source_path"),
                ConfigIssue::BatchSizeNotInteger("ten".into()),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("[DEFAULT]"));
        assert!(msg.contains("'source_path' is missing"));
        assert!(msg.contains("got 'ten'"));
        assert_eq!(err.code(), 10);
    }
}
