//! XML configuration support.
//! - Loads settings from config.xml (quick_xml), one `<section name="...">` per profile.
//! - Sections inherit any key they do not set from the DEFAULT section.
//! - Creates a secure template if the default config file is missing.
//!
//! Notes:
//! - This module only reads/writes the config file; value validation lives in `validate`.
//! - Unknown XML fields are rejected to surface misconfigurations early.

use anyhow::Result;
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::DEFAULT_SECTION;
use super::paths::{ConfigSource, default_log_path, path_has_symlink_ancestor};
use super::types::LogLevel;
use crate::errors::MoveFilesError;
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
    #[serde(rename = "section", default)]
    sections: Vec<RawSection>,
}

/// One `<section>` exactly as written in the file; every key is optional here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSection {
    #[serde(rename = "@name")]
    pub name: String,
    pub source_path: Option<String>,
    pub target_path: Option<String>,
    pub batch_size: Option<String>,
    /// Legacy single-mount flag; alias of `connect_target`
    pub connect: Option<String>,
    pub connect_source: Option<String>,
    pub connect_target: Option<String>,
    pub source_drive: Option<String>,
    pub target_drive: Option<String>,
    pub source_share: Option<String>,
    pub target_share: Option<String>,
    /// Legacy single-mount share; alias of `target_share`
    pub share: Option<String>,
}

impl RawSection {
    /// Fill every unset key from `defaults` (INI-style DEFAULT inheritance).
    fn inherit(self, defaults: &RawSection) -> RawSection {
        let pick = |own: Option<String>, def: &Option<String>| own.or_else(|| def.clone());
        RawSection {
            name: self.name,
            source_path: pick(self.source_path, &defaults.source_path),
            target_path: pick(self.target_path, &defaults.target_path),
            batch_size: pick(self.batch_size, &defaults.batch_size),
            connect: pick(self.connect, &defaults.connect),
            connect_source: pick(self.connect_source, &defaults.connect_source),
            connect_target: pick(self.connect_target, &defaults.connect_target),
            source_drive: pick(self.source_drive, &defaults.source_drive),
            target_drive: pick(self.target_drive, &defaults.target_drive),
            source_share: pick(self.source_share, &defaults.source_share),
            target_share: pick(self.target_share, &defaults.target_share),
            share: pick(self.share, &defaults.share),
        }
    }

    /// Key/value pairs that are set, in file order (used by `--debug`).
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("source_path", &self.source_path),
            ("target_path", &self.target_path),
            ("batch_size", &self.batch_size),
            ("connect", &self.connect),
            ("connect_source", &self.connect_source),
            ("connect_target", &self.connect_target),
            ("source_drive", &self.source_drive),
            ("target_drive", &self.target_drive),
            ("source_share", &self.source_share),
            ("target_share", &self.target_share),
            ("share", &self.share),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (k, v)))
        .collect()
    }
}

/// Parsed config file: process-wide options plus all sections.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
    pub sections: Vec<RawSection>,
}

impl ConfigFile {
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Look up `name` (case-insensitive) and apply DEFAULT inheritance.
    ///
    /// Asking for DEFAULT when the file has no DEFAULT section yields an empty
    /// section, so validation reports the individual missing keys.
    pub fn section(&self, name: &str) -> Result<RawSection, MoveFilesError> {
        let wanted = name.to_ascii_uppercase();
        let find = |n: &str| {
            self.sections
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(n))
                .cloned()
        };
        let defaults = find(DEFAULT_SECTION).unwrap_or_else(|| RawSection {
            name: DEFAULT_SECTION.to_string(),
            ..RawSection::default()
        });
        if wanted == DEFAULT_SECTION {
            return Ok(defaults);
        }
        let own = find(&wanted).ok_or(MoveFilesError::UnknownSection(wanted.clone()))?;
        let mut merged = own.inherit(&defaults);
        merged.name = wanted;
        Ok(merged)
    }
}

/// Parse config XML text.
pub fn parse_config_str(content: &str) -> Result<ConfigFile, quick_xml::DeError> {
    let parsed: XmlConfig = from_xml_str(content)?;
    let log_level = parsed
        .log_level
        .as_deref()
        .and_then(|s| s.trim().parse::<LogLevel>().ok());
    let log_file = parsed.log_file.as_deref().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() { None } else { Some(PathBuf::from(trimmed)) }
    });
    Ok(ConfigFile {
        log_level,
        log_file,
        sections: parsed.sections,
    })
}

/// Load a ConfigFile from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<ConfigFile, MoveFilesError> {
    let contents = fs::read_to_string(path).map_err(|e| MoveFilesError::ConfigRead {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let cfg = parse_config_str(&contents).map_err(|e| MoveFilesError::ConfigRead {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    debug!(path = %path.display(), sections = ?cfg.section_names(), "Loaded config file");
    Ok(cfg)
}

/// Outcome of `load_or_init`.
#[derive(Debug)]
pub enum LoadResult {
    Loaded(ConfigFile),
    /// No config existed at the default location; a template was written there.
    CreatedTemplate(PathBuf),
}

/// Load the chosen config file, writing a template when the default one is missing.
/// An explicitly requested file (flag or env) that does not exist is an error.
pub fn load_or_init(source: &ConfigSource) -> Result<LoadResult> {
    let path = source.path();
    if !path.exists() {
        if let ConfigSource::Default(p) = source {
            create_template_config(p)?;
            return Ok(LoadResult::CreatedTemplate(p.clone()));
        }
        return Err(MoveFilesError::ConfigRead {
            path: path.to_path_buf(),
            detail: "file does not exist".into(),
        }
        .into());
    }
    Ok(LoadResult::Loaded(load_config_from_xml_path(path)?))
}

/// Create default template config file and parent directory (best-effort permissions).
/// Uses secure creation to avoid following attacker-controlled symlinks on Unix.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        return Err(anyhow::anyhow!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/move_files.log".into());

    let content = format!(
        "<!--\n  move_files configuration (XML)\n\n  Top level:\n    log_level       -> quiet | normal | info | debug\n    log_file        -> append-only log file\n\n  Each <section name=\"...\"> is selected with -c/--section (default DEFAULT).\n  Keys missing from a section are taken from the DEFAULT section.\n    source_path     -> tree to move (required)\n    target_path     -> where the tree is moved to (required)\n    batch_size      -> max entries visited per run; 0 or negative = unlimited\n    connect_source  -> mount source_drive/source_share before the run (true/false)\n    connect_target  -> mount target_drive/target_share before the run (true/false)\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n  <section name=\"{}\">\n    <source_path>/path/to/source</source_path>\n    <target_path>/path/to/target</target_path>\n    <batch_size>0</batch_size>\n    <connect_source>false</connect_source>\n    <connect_target>false</connect_target>\n  </section>\n</config>\n",
        suggested_log, DEFAULT_SECTION
    );

    // Atomic, secure write (O_NOFOLLOW + create_new on Unix), then tighten perms.
    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}
