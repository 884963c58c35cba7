//! Config validation logic.
//! - Turns a raw section into typed `Settings`, collecting every problem before failing.
//! - Preflights the source/target directories once shares are mounted.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::types::{BatchLimit, Settings, ShareSettings};
use super::xml::RawSection;
use crate::errors::{ConfigIssue, MoveFilesError};

impl RawSection {
    /// Validate and convert into `Settings`.
    pub fn validate(&self) -> Result<Settings, MoveFilesError> {
        let mut issues = Vec::new();

        let source_path = required(&mut issues, "source_path", &self.source_path);
        let target_path = required(&mut issues, "target_path", &self.target_path);

        let batch_size = match self.batch_size.as_deref().map(str::trim) {
            None | Some("") => BatchLimit::Unlimited,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) => BatchLimit::from(n),
                Err(_) => {
                    issues.push(ConfigIssue::BatchSizeNotInteger(raw.to_string()));
                    BatchLimit::Unlimited
                }
            },
        };

        let connect_source = flag(&mut issues, "connect_source", &self.connect_source);
        let connect_target_flag = flag(&mut issues, "connect_target", &self.connect_target);
        let legacy_connect = flag(&mut issues, "connect", &self.connect);
        let connect_target = connect_target_flag || legacy_connect;

        let source_share = if connect_source {
            share(&mut issues, ("source_drive", &self.source_drive), ("source_share", &self.source_share))
        } else {
            None
        };
        let target_share = if connect_target {
            let share_value = self.target_share.as_ref().or(self.share.as_ref()).cloned();
            share(&mut issues, ("target_drive", &self.target_drive), ("target_share", &share_value))
        } else {
            None
        };

        if !issues.is_empty() {
            return Err(MoveFilesError::InvalidConfig {
                section: self.name.clone(),
                issues,
            });
        }

        Ok(Settings {
            section: self.name.clone(),
            source_path: PathBuf::from(source_path.unwrap_or_default()),
            target_path: PathBuf::from(target_path.unwrap_or_default()),
            batch_size,
            source_share,
            target_share,
        })
    }
}

fn required(issues: &mut Vec<ConfigIssue>, key: &'static str, value: &Option<String>) -> Option<String> {
    match value.as_deref().map(str::trim) {
        None => {
            issues.push(ConfigIssue::Missing(key));
            None
        }
        Some("") => {
            issues.push(ConfigIssue::Empty(key));
            None
        }
        Some(v) => Some(v.to_string()),
    }
}

fn flag(issues: &mut Vec<ConfigIssue>, key: &'static str, value: &Option<String>) -> bool {
    let Some(raw) = value.as_deref() else {
        return false;
    };
    match parse_bool(raw) {
        Some(b) => b,
        None => {
            issues.push(ConfigIssue::NotBoolean {
                key,
                value: raw.to_string(),
            });
            false
        }
    }
}

fn share(
    issues: &mut Vec<ConfigIssue>,
    drive: (&'static str, &Option<String>),
    share: (&'static str, &Option<String>),
) -> Option<ShareSettings> {
    let d = required(issues, drive.0, drive.1);
    let s = required(issues, share.0, share.1);
    Some(ShareSettings { drive: d?, share: s? })
}

/// Boolean-like strings as accepted in config files. Blank counts as false.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Check the source and target trees right before traversal.
///
/// - source must exist and be a readable directory.
/// - target is created when missing and must be a directory.
/// - the two must not be the same directory or nested inside one another.
pub fn preflight_paths(settings: &Settings) -> Result<()> {
    let src = &settings.source_path;
    let trg = &settings.target_path;

    if !src.is_dir() {
        error!(path = %src.display(), "source_path is not a directory");
        return Err(MoveFilesError::SourceInvalid(src.clone()).into());
    }
    fs::read_dir(src).with_context(|| {
        format!("Cannot read source_path directory '{}'; check permissions", src.display())
    })?;
    debug!("source_path readable: {}", src.display());

    ensure_dir_is_or_create(trg)?;

    let src_real = dunce::canonicalize(src).unwrap_or_else(|_| src.clone());
    let trg_real = dunce::canonicalize(trg).unwrap_or_else(|_| trg.clone());
    if src_real.starts_with(&trg_real) || trg_real.starts_with(&src_real) {
        return Err(MoveFilesError::OverlappingPaths {
            source_path: src_real,
            target_path: trg_real,
        }
        .into());
    }

    info!(
        "Paths validated: source='{}' target='{}'",
        src.display(),
        trg.display()
    );
    Ok(())
}

/// Ensure directory exists (create if missing). If exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            error!("target_path exists but isn't a directory: {}", path.display());
            return Err(MoveFilesError::TargetInvalid(path.to_path_buf()).into());
        }
    } else {
        fs::create_dir_all(path).with_context(|| {
            format!("Failed to create target_path directory '{}'", path.display())
        })?;
        info!("Created target_path directory: {}", path.display());
    }
    Ok(())
}
