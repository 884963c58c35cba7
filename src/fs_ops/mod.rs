//! Filesystem operations behind the move engine: the copy primitive and its helpers.

mod copy;
mod helpers;
mod io_copy;
mod metadata;
mod util;

pub use copy::{FileCopier, PreservingCopier, safe_copy_and_rename, safe_copy_and_rename_with_metadata};
pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use metadata::preserve_metadata;

#[cfg(unix)]
pub(crate) use util::fsync_dir;
pub(crate) use util::unique_temp_path;
