//! Tracing initialization.
//! Builds a registry with a console layer and an optional append-only file layer,
//! each with its own level filter.
//!
//! Behavior:
//! - File level is driven by LogLevel; console level by --verbose / --debug.
//! - JSON/non-JSON formatting is selected via the `json` flag for both layers.
//! - If `log_file` is provided and passes safety checks, a non-blocking file layer is added.
//!
//! Implementation notes:
//! - File logging uses tracing_appender::non_blocking to avoid blocking on I/O.
//! - We refuse file logging if any ancestor of the file path is a symlink.

use anyhow::{Context, Result};
use chrono::Local;
use move_files::output as out;
use move_files::platform::open_log_file_secure_append;
use move_files::{LogLevel, default_log_path, path_has_symlink_ancestor};
use std::fmt as stdfmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Registry, registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Local timestamp, `YYYY-MM-DD HH:MM:SS`.
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: &LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

/// Console verbosity: errors only unless asked for more.
pub fn console_level(verbose: bool, debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::DEBUG
    } else if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::ERROR
    }
}

fn fmt_layer<W>(writer: W, json: bool, ansi: bool, filter: LevelFilter) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    // Levels come from flags and config only; RUST_LOG is not read.
    let filter = EnvFilter::default().add_directive(filter.into());
    if json {
        tsfmt::layer()
            .json()
            .with_timer(LocalHumanTime)
            .with_level(true)
            .with_target(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    } else {
        tsfmt::layer()
            .compact()
            .with_timer(LocalHumanTime)
            .with_level(true)
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    }
}

/// Try to open a non-blocking file writer for logging:
/// - Refuse if any ancestor is a symlink (prints a warning and returns None)
/// - Best-effort create parent directory
/// - Open file for append and wrap with non_blocking
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            out::print_warn(&format!(
                "Refusing to enable file logging: ancestor of {} is a symlink",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!(
                "Error checking log path {} for symlinks: {e}",
                path.display()
            ));
            return None;
        }
        Ok(false) => {}
    }

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("Failed to open log file {}: {e}", path.display()));
            None
        }
    }
}

/// Install the global subscriber. Returns the WorkerGuard of the file writer,
/// which must be held until exit so buffered lines are flushed.
pub fn init_tracing(
    lvl: &LogLevel,
    console: LevelFilter,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let ansi = atty::is(atty::Stream::Stderr);
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(std::io::stderr, json, ansi, console)];
    let mut guard = None;

    if let Some(path) = log_file {
        match maybe_open_non_blocking_writer(path) {
            Some((writer, g)) => {
                layers.push(fmt_layer(writer, json, false, to_level_filter(lvl)));
                guard = Some(g);
            }
            None => {
                out::print_warn(&format!(
                    "File logging to '{}' is disabled; check that the directory is writable. Errors still go to the console.",
                    path.display()
                ));
                if let Some(def) = default_log_path().filter(|d| d != path) {
                    out::print_info(&format!("The default log path is {}", def.display()));
                }
            }
        }
    }

    registry()
        .with(layers)
        .try_init()
        .context("installing the tracing subscriber")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_level_follows_flags() {
        assert_eq!(console_level(false, false), LevelFilter::ERROR);
        assert_eq!(console_level(true, false), LevelFilter::INFO);
        assert_eq!(console_level(true, true), LevelFilter::DEBUG);
    }

    #[test]
    fn file_level_follows_log_level() {
        assert_eq!(to_level_filter(&LogLevel::Quiet), LevelFilter::ERROR);
        assert_eq!(to_level_filter(&LogLevel::Normal), LevelFilter::INFO);
        assert_eq!(to_level_filter(&LogLevel::Debug), LevelFilter::TRACE);
    }
}
