//! Core library for `move_files`.
//!
//! Moves a directory tree from a source to a target one file at a time:
//! copy, verify the copy against the source, delete the source, and prune
//! source directories once they are empty. A batch limit caps how many
//! entries a single run visits so huge trees can be migrated over many
//! scheduled runs. Optional network shares are mounted around the run.

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod session;
pub mod share;
pub mod verify;

pub use config::{
    BatchLimit, Config, ConfigFile, ConfigSource, LoadResult, LogLevel, RawSection, Settings,
    ShareSettings, default_config_path, default_log_path, load_or_init, path_has_symlink_ancestor,
    preflight_paths, resolve_config_source,
};
pub use engine::{MoveEngine, MoveOutcome, RunState, RunSummary};
pub use errors::{ConfigIssue, MoveFilesError};
pub use fs_ops::{FileCopier, PreservingCopier};
pub use session::{SessionReport, run_session};
pub use share::{ShareRole, Shares};
pub use verify::{Fingerprint, fingerprint, fingerprints_match};
