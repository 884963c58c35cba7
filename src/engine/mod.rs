//! Move engine: walks the source tree depth-first and moves every regular file
//! into the mirrored location under the target.
//!
//! For each file the engine copies, fingerprints both sides and deletes the
//! source only when the fingerprints match. Directories are created on the
//! target before descending and removed from the source once they are empty.
//!
//! Every listing entry (file, directory, or anything else) counts toward the
//! batch limit. When the next entry would exceed it, traversal stops at once and
//! `RunSummary::stopped_at_cutoff` is set. Per-entry failures are logged and
//! tallied; they never abort the run.
//!
//! Symlinks are followed; a link pointing back up the tree is not detected.
//! A target that resolves back into the source tree is refused and left alone.

mod state;
mod visit;

pub use state::{DirOutcome, Flow, MoveOutcome, RunState, RunSummary, Tally};

use std::path::Path;
use tracing::info;

use crate::config::BatchLimit;
use crate::fs_ops::{FileCopier, PreservingCopier};

#[derive(Debug, Default, Clone)]
pub struct MoveEngine<C: FileCopier = PreservingCopier> {
    copier: C,
}

impl MoveEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: FileCopier> MoveEngine<C> {
    /// Engine using a custom copy step.
    pub fn with_copier(copier: C) -> Self {
        Self { copier }
    }

    /// Move the contents of `source` into `target`, stopping after `limit` entries.
    /// Both roots must already exist; the roots themselves are never removed.
    pub fn run(&self, source: &Path, target: &Path, limit: BatchLimit) -> RunSummary {
        let mut state = RunState::new(source, target, limit);
        let flow = self.run_with(&mut state);
        state.finish(flow)
    }

    /// Traverse from the roots recorded in `state`, updating it in place.
    pub fn run_with(&self, state: &mut RunState) -> Flow {
        let source = state.source_root().to_path_buf();
        let target = state.target_root().to_path_buf();
        info!(
            "Moving files from {} to {} (batch size {})",
            source.display(),
            target.display(),
            state.limit()
        );
        self.visit(&source, &target, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    /// Copies correctly, then flips the last byte of the copy.
    struct Corrupting;

    impl FileCopier for Corrupting {
        fn copy_file(&self, src: &Path, dest: &Path) -> Result<u64> {
            let mut data = fs::read(src)?;
            if let Some(b) = data.last_mut() {
                *b ^= 0xff;
            }
            fs::write(dest, &data)?;
            Ok(data.len() as u64)
        }
    }

    #[test]
    fn nested_tree_is_moved_and_pruned() {
        let src = tempdir().unwrap();
        let trg = tempdir().unwrap();
        fs::create_dir_all(src.path().join("A/B")).unwrap();
        fs::write(src.path().join("A/x.txt"), "x").unwrap();
        fs::write(src.path().join("A/B/y.txt"), "yy").unwrap();

        let summary = MoveEngine::new().run(src.path(), trg.path(), BatchLimit::Unlimited);

        assert!(!summary.stopped_at_cutoff);
        assert_eq!(summary.visited, 4);
        assert_eq!(summary.tally.moved, 2);
        assert_eq!(summary.tally.dirs_removed, 2);
        assert_eq!(summary.tally.bytes_moved, 3);
        assert_eq!(fs::read_to_string(trg.path().join("A/x.txt")).unwrap(), "x");
        assert_eq!(fs::read_to_string(trg.path().join("A/B/y.txt")).unwrap(), "yy");
        assert!(!src.path().join("A").exists());
        assert!(src.path().exists());
    }

    #[test]
    fn mismatch_keeps_source_and_parent_dir() {
        let src = tempdir().unwrap();
        let trg = tempdir().unwrap();
        fs::create_dir(src.path().join("d")).unwrap();
        fs::write(src.path().join("d/f.bin"), "payload").unwrap();

        let summary =
            MoveEngine::with_copier(Corrupting).run(src.path(), trg.path(), BatchLimit::Unlimited);

        assert_eq!(summary.tally.verification_failed, 1);
        assert_eq!(summary.tally.moved, 0);
        assert_eq!(summary.tally.dirs_retained, 1);
        assert!(src.path().join("d/f.bin").exists());
        assert!(trg.path().join("d/f.bin").exists());
    }

    #[test]
    fn cutoff_counts_directories_too() {
        let src = tempdir().unwrap();
        let trg = tempdir().unwrap();
        fs::create_dir(src.path().join("only")).unwrap();
        fs::write(src.path().join("only/a"), "a").unwrap();
        fs::write(src.path().join("only/b"), "b").unwrap();

        let summary = MoveEngine::new().run(src.path(), trg.path(), BatchLimit::Entries(2));

        assert!(summary.stopped_at_cutoff);
        assert_eq!(summary.visited, 2);
        assert_eq!(summary.tally.moved, 1);
        assert!(src.path().join("only").exists());
    }

    #[test]
    fn existing_target_dir_is_reused() {
        let src = tempdir().unwrap();
        let trg = tempdir().unwrap();
        fs::create_dir(src.path().join("d")).unwrap();
        fs::create_dir(trg.path().join("d")).unwrap();
        fs::write(src.path().join("d/f"), "1").unwrap();

        let summary = MoveEngine::new().run(src.path(), trg.path(), BatchLimit::Unlimited);
        assert_eq!(summary.tally.moved, 1);
        assert_eq!(summary.tally.dir_errors, 0);
    }

    #[test]
    fn file_in_place_of_target_dir_leaves_source_dir_alone() {
        let src = tempdir().unwrap();
        let trg = tempdir().unwrap();
        fs::create_dir(src.path().join("d")).unwrap();
        fs::write(src.path().join("d/f"), "1").unwrap();
        fs::write(trg.path().join("d"), "not a dir").unwrap();

        let summary = MoveEngine::new().run(src.path(), trg.path(), BatchLimit::Unlimited);
        assert_eq!(summary.tally.dir_errors, 1);
        assert_eq!(summary.visited, 1);
        assert!(src.path().join("d/f").exists());
    }

    #[test]
    fn target_equal_to_source_never_deletes() {
        let src = tempdir().unwrap();
        fs::create_dir(src.path().join("d")).unwrap();
        fs::write(src.path().join("top"), "keep").unwrap();
        fs::write(src.path().join("d/inner"), "keep too").unwrap();

        let summary = MoveEngine::new().run(src.path(), src.path(), BatchLimit::Unlimited);

        assert_eq!(summary.tally.moved, 0);
        assert_eq!(summary.tally.copy_failed, 1);
        assert_eq!(summary.tally.dir_errors, 1);
        assert_eq!(fs::read_to_string(src.path().join("top")).unwrap(), "keep");
        assert_eq!(fs::read_to_string(src.path().join("d/inner")).unwrap(), "keep too");
    }
}
