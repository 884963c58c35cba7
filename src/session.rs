//! One run from start to finish: connect shares, preflight paths, move,
//! then disconnect and summarise. A batch cutoff takes the graceful-stop path.

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::{Settings, preflight_paths};
use crate::engine::{MoveEngine, RunSummary};
use crate::errors::MoveFilesError;
use crate::fs_ops::FileCopier;
use crate::share::Shares;

/// Outcome of a session that got as far as running the engine.
#[derive(Debug)]
pub struct SessionReport {
    pub summary: RunSummary,
    /// Shares that could not be detached; the operator has to do it by hand.
    pub disconnect_failures: Vec<MoveFilesError>,
}

impl SessionReport {
    pub fn stopped_at_cutoff(&self) -> bool {
        self.summary.stopped_at_cutoff
    }
}

/// Connect, preflight, move, disconnect.
///
/// Connect and preflight failures are returned as errors; shares connected up to
/// that point are detached first. Everything after the engine starts ends in `Ok`.
pub fn run_session<C: FileCopier>(
    settings: &Settings,
    shares: &mut Shares,
    engine: &MoveEngine<C>,
) -> Result<SessionReport> {
    shares.connect_all()?;

    if let Err(e) = preflight_paths(settings) {
        error!(error = %e, "preflight failed; nothing was moved");
        warn_disconnects(&shares.disconnect_all());
        return Err(e);
    }

    let summary = engine.run(&settings.source_path, &settings.target_path, settings.batch_size);

    let report = if summary.stopped_at_cutoff {
        graceful_stop(summary, shares)
    } else {
        info!("Traversal complete");
        finish(summary, shares)
    };
    Ok(report)
}

/// Batch limit reached: detach every connected share and report. Not an error.
fn graceful_stop(summary: RunSummary, shares: &mut Shares) -> SessionReport {
    info!(
        visited = summary.visited,
        limit = %summary.batch_size,
        "Batch limit reached; stopping"
    );
    finish(summary, shares)
}

fn finish(summary: RunSummary, shares: &mut Shares) -> SessionReport {
    let disconnect_failures = shares.disconnect_all();
    warn_disconnects(&disconnect_failures);
    info!(
        moved = summary.tally.moved,
        failed = summary.tally.failures(),
        skipped = summary.tally.skipped,
        bytes = summary.tally.bytes_moved,
        "{summary}"
    );
    SessionReport {
        summary,
        disconnect_failures,
    }
}

fn warn_disconnects(failures: &[MoveFilesError]) {
    for f in failures {
        warn!(code = f.code(), "{f}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BatchLimit, ShareSettings};
    use crate::share::{CommandLine, CommandRunner, MountFlavor, ShareRole};
    use std::cell::RefCell;
    use std::fs;
    use std::io;
    use std::rc::Rc;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl CommandRunner for Recorder {
        fn run(&self, cmd: &CommandLine) -> io::Result<bool> {
            self.0.borrow_mut().push(cmd.program.clone());
            Ok(true)
        }
    }

    fn with_target_share(src: &std::path::Path, trg: &std::path::Path) -> Settings {
        Settings {
            target_share: Some(ShareSettings {
                drive: "nas:/x".into(),
                share: "/mnt/x".into(),
            }),
            ..Settings::new(src, trg)
        }
    }

    #[test]
    fn cutoff_disconnects_and_reports() {
        let src = tempdir().unwrap();
        let trg = tempdir().unwrap();
        for n in ["a", "b", "c"] {
            fs::write(src.path().join(n), n).unwrap();
        }
        let settings = Settings {
            batch_size: BatchLimit::Entries(2),
            ..with_target_share(src.path(), trg.path())
        };
        let rec = Recorder::default();
        let mut shares = Shares::with_runner(&settings, MountFlavor::Nfs, Box::new(rec.clone()));

        let report = run_session(&settings, &mut shares, &MoveEngine::new()).unwrap();

        assert!(report.stopped_at_cutoff());
        assert_eq!(report.summary.tally.moved, 2);
        assert!(!shares.is_connected(ShareRole::Target));
        assert_eq!(*rec.0.borrow(), vec!["mount", "umount"]);
    }

    #[test]
    fn preflight_failure_disconnects_before_returning() {
        let trg = tempdir().unwrap();
        let settings = with_target_share(&trg.path().join("missing"), trg.path());
        let rec = Recorder::default();
        let mut shares = Shares::with_runner(&settings, MountFlavor::Nfs, Box::new(rec.clone()));

        let err = run_session(&settings, &mut shares, &MoveEngine::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MoveFilesError>(),
            Some(MoveFilesError::SourceInvalid(_))
        ));
        assert_eq!(*rec.0.borrow(), vec!["mount", "umount"]);
    }
}
