//! Metadata preservation.
//! - Copies timestamps (atime, mtime) and permissions from source->dest.
//! - Best-effort: failures are logged and ignored, the copy itself stands.

use anyhow::Result;
use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

/// Carry access/modification times and permission bits from `src_meta` over to `dest`.
pub fn preserve_metadata(dest: &Path, src_meta: &fs::Metadata) -> Result<()> {
    let atime = FileTime::from_last_access_time(src_meta);
    let mtime = FileTime::from_last_modification_time(src_meta);
    match set_file_times(dest, atime, mtime) {
        Ok(()) => trace!(path = %dest.display(), %mtime, "timestamps copied"),
        Err(e) => warn!(path = %dest.display(), error = %e, "could not copy timestamps"),
    }

    // Unix copies the full mode (setuid/setgid/sticky included); Windows only has the readonly bit.
    let perms = src_meta.permissions();
    #[cfg(unix)]
    let detail = {
        use std::os::unix::fs::PermissionsExt;
        format!("{:o}", perms.mode() & 0o7777)
    };
    #[cfg(not(unix))]
    let detail = format!("readonly={}", perms.readonly());
    if let Err(e) = fs::set_permissions(dest, perms) {
        warn!(path = %dest.display(), mode = %detail, error = %e, "could not copy permissions");
    }

    Ok(())
}
