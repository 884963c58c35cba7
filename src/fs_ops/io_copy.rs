//! Byte copy into a fresh file, synced to disk before returning.
//!
//! The destination is opened with `create_new`, so an existing path is never
//! clobbered here; replacing the real target is the caller's rename. The source
//! is read once up to EOF. Bytes appended to it during the copy are not seen,
//! and the fingerprint check after every copy catches any such difference.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

const CHUNK: usize = 1024 * 1024;

/// Copy `src` into the new file `dst` and fsync it. Returns the byte count.
pub(super) fn copy_streaming(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut input = File::open(src)?;
    let mut output = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let mut buf = vec![0u8; CHUNK];
    let mut total = 0u64;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        output.write_all(&buf[..n])?;
        total += n as u64;
    }
    output.sync_all()?;
    Ok(total)
}
