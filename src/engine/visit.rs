//! Depth-first traversal: copy, verify, delete, prune.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, error, info, warn};

use super::MoveEngine;
use super::state::{DirOutcome, Flow, MoveOutcome, RunState};
use crate::fs_ops::{FileCopier, io_error_with_help};
use crate::verify::{fingerprint, fingerprints_match};

impl<C: FileCopier> MoveEngine<C> {
    /// Process every entry of `source_dir` into `target_dir`.
    pub(super) fn visit(&self, source_dir: &Path, target_dir: &Path, state: &mut RunState) -> Flow {
        let names = match list_dir(source_dir) {
            Ok(names) => names,
            Err(e) => {
                error!(dir = %source_dir.display(), error = %e, "cannot list directory");
                state.record_dir(DirOutcome::Failed);
                return Flow::Continue;
            }
        };

        for name in names {
            if state.enter() == Flow::Stop {
                info!(visited = state.visited(), limit = %state.limit(), "batch limit reached");
                return Flow::Stop;
            }

            let src = source_dir.join(&name);
            let trg = target_dir.join(&name);

            if src.is_dir() {
                if self.visit_subdir(&src, &trg, state) == Flow::Stop {
                    return Flow::Stop;
                }
            } else if src.is_file() {
                let (outcome, bytes) = self.move_file(&src, &trg);
                state.record_file(outcome, bytes);
            } else {
                warn!(path = %src.display(), "not a regular file or directory; skipped");
                state.record_skipped();
            }
        }
        Flow::Continue
    }

    fn visit_subdir(&self, src: &Path, trg: &Path, state: &mut RunState) -> Flow {
        if let Err(e) = ensure_target_dir(trg) {
            error!(src = %src.display(), error = %e, "cannot create target directory; leaving source directory as is");
            state.record_dir(DirOutcome::Failed);
            return Flow::Continue;
        }
        if resolves_under(trg, state.source_root()) {
            error!(
                src = %src.display(),
                trg = %trg.display(),
                "target directory resolves into the source tree; leaving source directory as is"
            );
            state.record_dir(DirOutcome::Failed);
            return Flow::Continue;
        }
        info!("{} is a directory, the target is {}", src.display(), trg.display());

        if self.visit(src, trg, state) == Flow::Stop {
            return Flow::Stop;
        }

        let outcome = match is_empty_dir(src) {
            Ok(true) => {
                info!("Source dir {} is empty, deleting it", src.display());
                match fs::remove_dir(src) {
                    Ok(()) => DirOutcome::Removed,
                    Err(e) => {
                        let err = io_error_with_help("delete source directory", src)(e);
                        error!(error = %err, "directory delete failed; left in place");
                        DirOutcome::Failed
                    }
                }
            }
            Ok(false) => {
                info!("Not all entries in {} were moved; directory kept", src.display());
                DirOutcome::Retained
            }
            Err(e) => {
                error!(dir = %src.display(), error = %e, "cannot re-list directory; cleanup skipped");
                DirOutcome::Failed
            }
        };
        state.record_dir(outcome);
        Flow::Continue
    }

    /// Copy, verify, then delete the source. The source is removed only when
    /// both fingerprints exist and are equal.
    fn move_file(&self, src: &Path, trg: &Path) -> (MoveOutcome, u64) {
        if same_file(src, trg) {
            error!(
                src = %src.display(),
                trg = %trg.display(),
                "source and target are the same file; source left in place"
            );
            return (MoveOutcome::CopyFailed, 0);
        }
        info!("Copying the file {} to {}", src.display(), trg.display());
        let bytes = match self.copier.copy_file(src, trg) {
            Ok(n) => n,
            Err(e) => {
                error!(src = %src.display(), error = %e, "copy failed; source left in place");
                return (MoveOutcome::CopyFailed, 0);
            }
        };

        let src_fp = fingerprint(src);
        let trg_fp = fingerprint(trg);
        if !fingerprints_match(src_fp.as_ref(), trg_fp.as_ref()) {
            error!(
                src = %src.display(),
                trg = %trg.display(),
                src_digest = ?src_fp,
                trg_digest = ?trg_fp,
                "verification mismatch; source and copy both kept"
            );
            return (MoveOutcome::VerificationFailed, 0);
        }

        debug!("Deleting {}", src.display());
        match fs::remove_file(src) {
            Ok(()) => (MoveOutcome::Moved, bytes),
            Err(e) => {
                let err = io_error_with_help("delete source file", src)(e);
                error!(error = %err, "source delete failed; verified copy kept");
                (MoveOutcome::SourceDeleteFailed, 0)
            }
        }
    }
}

/// Snapshot of a directory's entry names, taken before anything is moved.
fn list_dir(dir: &Path) -> io::Result<Vec<OsString>> {
    fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect()
}

fn is_empty_dir(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

/// Create `dir`; an existing directory is fine.
fn ensure_target_dir(dir: &Path) -> io::Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Both paths exist and resolve to the same location.
fn same_file(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `path` resolves to `root` or somewhere below it.
fn resolves_under(path: &Path, root: &Path) -> bool {
    match (dunce::canonicalize(path), dunce::canonicalize(root)) {
        (Ok(p), Ok(r)) => p.starts_with(r),
        _ => false,
    }
}
