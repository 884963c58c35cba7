//! Copy primitive used by the move engine:
//! - Copies to a temp file in the destination directory
//! - Ensures data durability (io_copy::copy_streaming fsyncs the temp file)
//! - Atomically renames temp -> dest, replacing an existing file as-is
//! - Carries timestamps and permission bits over to the copy
//!
//! A target file is therefore either absent, its previous content, or the
//! complete new copy; it is never left half written.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::Path;

use super::helpers::io_error_with_help;
use super::{io_copy, metadata, util};

/// How the engine copies one regular file. Returns the number of bytes copied.
pub trait FileCopier {
    fn copy_file(&self, src: &Path, dest: &Path) -> Result<u64>;
}

/// Default copier: `safe_copy_and_rename` followed by metadata preservation.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreservingCopier;

impl FileCopier for PreservingCopier {
    fn copy_file(&self, src: &Path, dest: &Path) -> Result<u64> {
        safe_copy_and_rename_with_metadata(src, dest)
    }
}

/// Copy src -> temp in dest dir, then atomic rename temp -> dest.
/// The destination directory must already exist.
pub fn safe_copy_and_rename(src: &Path, dest: &Path) -> Result<u64> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;

    let tmp_path = util::unique_temp_path(dest_dir, "copy");

    let bytes = io_copy::copy_streaming(src, &tmp_path)
        .map_err(io_error_with_help("copy to temporary file", &tmp_path))
        .and_then(|n| replace_with(&tmp_path, dest).map(|()| n));
    if bytes.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    bytes
}

/// Rename `tmp` over `dest`. `fs::rename` replaces an existing file on every
/// supported platform; on Unix the directory entry is then flushed.
fn replace_with(tmp: &Path, dest: &Path) -> Result<()> {
    fs::rename(tmp, dest)
        .with_context(|| format!("rename '{}' -> '{}'", tmp.display(), dest.display()))?;
    #[cfg(unix)]
    if let Some(parent) = dest.parent() {
        // The data is already synced; a failed directory fsync does not undo the rename.
        let _ = util::fsync_dir(parent);
    }
    Ok(())
}

/// Safe copy-and-rename, then copy timestamps and permissions from `src`.
pub fn safe_copy_and_rename_with_metadata(src: &Path, dest: &Path) -> Result<u64> {
    let meta = fs::metadata(src).map_err(io_error_with_help("stat source", src))?;
    let bytes = safe_copy_and_rename(src, dest)?;
    metadata::preserve_metadata(dest, &meta)
        .with_context(|| format!("preserve metadata for {}", dest.display()))?;
    Ok(bytes)
}
