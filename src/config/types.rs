//! Core configuration types.
//! - Settings holds one validated configuration section.
//! - BatchLimit turns the raw `batch_size` integer into an explicit cutoff.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::paths;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Maximum number of entries visited in a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchLimit {
    #[default]
    Unlimited,
    Entries(u64),
}

impl BatchLimit {
    /// True once `visited` has gone past the limit.
    pub fn exceeded_by(&self, visited: u64) -> bool {
        match self {
            BatchLimit::Unlimited => false,
            BatchLimit::Entries(n) => visited > *n,
        }
    }
}

impl From<i64> for BatchLimit {
    /// Zero and negative sizes mean "no limit".
    fn from(raw: i64) -> Self {
        if raw <= 0 {
            BatchLimit::Unlimited
        } else {
            BatchLimit::Entries(raw as u64)
        }
    }
}

impl fmt::Display for BatchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchLimit::Unlimited => f.write_str("unlimited"),
            BatchLimit::Entries(n) => write!(f, "{n}"),
        }
    }
}

/// Mount parameters for one share role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSettings {
    /// Drive letter (Windows) or NFS export (POSIX)
    pub drive: String,
    /// UNC path (Windows) or mount point (POSIX)
    pub share: String,
}

/// A validated configuration section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Name of the section these values came from (upper-cased)
    pub section: String,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub batch_size: BatchLimit,
    /// Present only when `connect_source` is true
    pub source_share: Option<ShareSettings>,
    /// Present only when `connect_target` (or legacy `connect`) is true
    pub target_share: Option<ShareSettings>,
}

impl Settings {
    /// Construct settings for a plain local move; no shares, no limit.
    pub fn new(source_path: impl Into<PathBuf>, target_path: impl Into<PathBuf>) -> Self {
        Self {
            section: super::DEFAULT_SECTION.to_string(),
            source_path: source_path.into(),
            target_path: target_path.into(),
            batch_size: BatchLimit::Unlimited,
            source_share: None,
            target_share: None,
        }
    }
}

/// Runtime configuration: process-wide options plus the chosen section.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log file verbosity
    pub log_level: LogLevel,
    /// Path to the append-only log file
    pub log_file: Option<PathBuf>,
    pub settings: Settings,
}

impl Config {
    pub fn new(settings: Settings) -> Self {
        Self {
            log_level: LogLevel::Normal,
            log_file: paths::default_log_path(),
            settings,
        }
    }
}
