//! Content verification.
//!
//! A fingerprint is the BLAKE3 digest of a file's full content, read in fixed
//! size chunks. Two files are considered identical only when both fingerprints
//! could be computed and are equal; a file that cannot be read never matches
//! anything, so a source is never deleted on the strength of a missing digest.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::warn;

use crate::fs_ops::io_error_with_help_io;

const CHUNK_SIZE: usize = 64 * 1024;

/// Content digest of one file.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Hash `path` chunk by chunk.
pub fn hash_file(path: &Path) -> io::Result<Fingerprint> {
    let mut file = File::open(path).map_err(io_error_with_help_io("open for fingerprint", path))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(io_error_with_help_io("read for fingerprint", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Fingerprint(hasher.finalize().into()))
}

/// Fingerprint of `path`, or `None` when it does not exist or cannot be read.
pub fn fingerprint(path: &Path) -> Option<Fingerprint> {
    match hash_file(path) {
        Ok(fp) => Some(fp),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot fingerprint file");
            None
        }
    }
}

/// Exact digest equality; an unavailable digest on either side is never equal.
pub fn fingerprints_match(a: Option<&Fingerprint>, b: Option<&Fingerprint>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
