//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600};
#[cfg(not(unix))]
pub use windows::{open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600};

#[cfg(unix)]
use unix::create_private_new;
#[cfg(not(unix))]
use windows::create_private_new;

use anyhow::{Context, Result, bail};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::fs_ops::unique_temp_path;

/// Write a file that must not exist yet: private temp sibling, fsync, rename.
/// A reader never sees a partial file; the temp is removed on failure.
pub fn write_config_secure_new_0600(path: &Path, contents: &[u8]) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite existing file {}", path.display());
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("create directory '{}'", dir.display()))?;

    let tmp = unique_temp_path(dir, "config");
    let written = create_private_new(&tmp)
        .and_then(|mut f| {
            f.write_all(contents)?;
            f.sync_all()
        })
        .with_context(|| format!("write '{}'", tmp.display()))
        .and_then(|()| {
            fs::rename(&tmp, path)
                .with_context(|| format!("rename '{}' -> '{}'", tmp.display(), path.display()))
        });
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
        return written;
    }

    #[cfg(unix)]
    crate::fs_ops::fsync_dir(dir).with_context(|| format!("fsync '{}'", dir.display()))?;
    Ok(())
}
