//! Per-run state and the summary handed back to the caller.

use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::BatchLimit;

/// Whether traversal should go on after the current entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Batch limit reached; unwind without touching anything else.
    Stop,
}

/// Result of moving one regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Copied, verified, source deleted.
    Moved,
    /// Copy differs from the source; both are kept.
    VerificationFailed,
    /// Copy step failed; source untouched.
    CopyFailed,
    /// Verified copy exists but the source could not be deleted.
    SourceDeleteFailed,
}

/// Result of cleaning up one source directory after its contents were processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirOutcome {
    Removed,
    /// Still has entries (something inside was left behind).
    Retained,
    /// Empty but could not be removed, could not be listed, or its target could not be created.
    Failed,
}

/// Counters for everything that happened during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub moved: u64,
    pub verification_failed: u64,
    pub copy_failed: u64,
    pub source_delete_failed: u64,
    /// Entries that are neither a directory nor a regular file
    pub skipped: u64,
    pub dirs_removed: u64,
    pub dirs_retained: u64,
    pub dir_errors: u64,
    pub bytes_moved: u64,
}

impl Tally {
    /// Files and directories whose processing reported a problem.
    pub fn failures(&self) -> u64 {
        self.verification_failed + self.copy_failed + self.source_delete_failed + self.dir_errors
    }
}

/// Mutable state of one engine invocation.
#[derive(Debug, Clone)]
pub struct RunState {
    visited: u64,
    limit: BatchLimit,
    source_root: PathBuf,
    target_root: PathBuf,
    tally: Tally,
}

impl RunState {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>, limit: BatchLimit) -> Self {
        Self {
            visited: 0,
            limit,
            source_root: source_root.into(),
            target_root: target_root.into(),
            tally: Tally::default(),
        }
    }

    /// Count one listing entry. Returns `Flow::Stop`, without counting, once the
    /// entry would go past the batch limit.
    pub fn enter(&mut self) -> Flow {
        let next = self.visited + 1;
        if self.limit.exceeded_by(next) {
            return Flow::Stop;
        }
        self.visited = next;
        Flow::Continue
    }

    pub fn record_file(&mut self, outcome: MoveOutcome, bytes: u64) {
        let t = &mut self.tally;
        match outcome {
            MoveOutcome::Moved => {
                t.moved += 1;
                t.bytes_moved += bytes;
            }
            MoveOutcome::VerificationFailed => t.verification_failed += 1,
            MoveOutcome::CopyFailed => t.copy_failed += 1,
            MoveOutcome::SourceDeleteFailed => t.source_delete_failed += 1,
        }
    }

    pub fn record_dir(&mut self, outcome: DirOutcome) {
        match outcome {
            DirOutcome::Removed => self.tally.dirs_removed += 1,
            DirOutcome::Retained => self.tally.dirs_retained += 1,
            DirOutcome::Failed => self.tally.dir_errors += 1,
        }
    }

    pub fn record_skipped(&mut self) {
        self.tally.skipped += 1;
    }

    pub fn visited(&self) -> u64 {
        self.visited
    }

    pub fn limit(&self) -> BatchLimit {
        self.limit
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    pub fn finish(self, flow: Flow) -> RunSummary {
        RunSummary {
            source: self.source_root,
            target: self.target_root,
            batch_size: self.limit,
            visited: self.visited,
            tally: self.tally,
            stopped_at_cutoff: flow == Flow::Stop,
            finished_at: Local::now(),
        }
    }
}

/// What a run did; rendered as the closing log/console line.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub source: PathBuf,
    pub target: PathBuf,
    pub batch_size: BatchLimit,
    /// Entries processed (files and directories)
    pub visited: u64,
    pub tally: Tally,
    /// True when the run ended because the batch limit was reached.
    pub stopped_at_cutoff: bool,
    pub finished_at: DateTime<Local>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Finished moving {} entries from {} to {} at {}",
            self.visited,
            self.source.display(),
            self.target.display(),
            self.finished_at.format("%a %b %e %H:%M:%S %Y"),
        )?;
        write!(
            f,
            " ({} files moved, {} failed",
            self.tally.moved,
            self.tally.failures()
        )?;
        if self.stopped_at_cutoff {
            write!(f, ", stopped at batch limit {}", self.batch_size)?;
        }
        f.write_str(")")
    }
}
