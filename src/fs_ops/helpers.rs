//! I/O error enrichment.
//!
//! Adds the operation, the path and a platform-aware hint to an io::Error so a
//! single log line tells the operator what to fix before the next run:
//!
//!   fs::remove_file(src).map_err(io_error_with_help("delete source file", src))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Hint for a raw OS error code, if we have one.
fn os_hint(code: i32) -> Option<&'static str> {
    #[cfg(unix)]
    {
        let hint = match code {
            libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
            libc::EXDEV => "cross-filesystem; atomic rename not possible",
            libc::EBUSY => "resource busy; another process is using it",
            libc::ENOENT => "path not found; verify it exists",
            libc::EEXIST => "already exists",
            libc::ENOSPC => "insufficient space on device",
            libc::EROFS => "read-only filesystem; cannot write here",
            libc::ENOTEMPTY => "directory not empty",
            libc::EISDIR => "a directory is in the way",
            libc::ESTALE => "stale network file handle; is the share still mounted?",
            libc::EIO => "low-level I/O error; check the device or network share",
            libc::ENAMETOOLONG => "filename or path too long",
            libc::EMFILE => "process file descriptor limit reached",
            _ => return None,
        };
        Some(hint)
    }
    #[cfg(windows)]
    {
        let hint = match code {
            5 => "access denied; check permissions",
            2 | 3 => "path not found; verify it exists",
            32 => "sharing violation; file is in use",
            53 | 67 => "network path not found; is the share connected?",
            112 => "insufficient disk space",
            19 => "write protected / read-only media",
            145 => "directory not empty",
            206 => "filename or path too long",
            _ => return None,
        };
        Some(hint)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = code;
        None
    }
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    let hint = match e.raw_os_error() {
        Some(code) => os_hint(code),
        None => kind_hint(e.kind()),
    };
    if let Some(h) = hint {
        msg.push_str(" (");
        msg.push_str(h);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// Closure for `.map_err(...)` converting io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// Same as `io_error_with_help` but keeps the io::Error type and its ErrorKind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
