use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static SEQ: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling name inside `dir`: `.move_files.<tag>.<pid>.<nanos>.<seq>.tmp`.
/// Unique per process and per call, so concurrent writers never collide.
pub(crate) fn unique_temp_path(dir: &Path, tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(
        ".move_files.{tag}.{}.{nanos}.{seq}.tmp",
        std::process::id()
    ))
}

/// Flush directory entries (a completed rename) to disk.
#[cfg(unix)]
pub(crate) fn fsync_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_hidden_siblings_and_distinct() {
        let dir = Path::new("some/dir");
        let a = unique_temp_path(dir, "copy");
        let b = unique_temp_path(dir, "copy");
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(dir));
        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".move_files.copy.") && name.ends_with(".tmp"));
    }
}
