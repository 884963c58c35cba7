//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug and also dumps the chosen section.
//! - --batch-size overrides the section's batch_size.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{BatchLimit, Config, LogLevel};

/// Move a directory tree to another location, verifying every file before
/// deleting its source. CLI flags override values from the XML config.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move a directory tree file by file, verifying each copy before deleting the source"
)]
pub struct Args {
    /// Print progress messages to the console.
    #[arg(short = 'v', long, help = "Print progress messages to the console")]
    pub verbose: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging and print the chosen config section"
    )]
    pub debug: bool,

    /// Config section to use.
    #[arg(
        short = 'c',
        long,
        value_name = "NAME",
        default_value = crate::config::DEFAULT_SECTION,
        help = "Config section to use (case-insensitive)"
    )]
    pub section: String,

    /// Alternate config file (overrides MOVE_FILES_CONFIG and the default location).
    #[arg(
        short = 'f',
        long,
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        help = "Read this config file instead of the default"
    )]
    pub config: Option<PathBuf>,

    /// Maximum entries to visit in this run (0 or negative = unlimited).
    #[arg(
        long,
        value_name = "N",
        allow_negative_numbers = true,
        help = "Override batch_size: max entries visited this run (<= 0 means unlimited)"
    )]
    pub batch_size: Option<i64>,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where move_files will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by move_files and exit")]
    pub print_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(n) = self.batch_size {
            cfg.settings.batch_size = BatchLimit::from(n);
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
