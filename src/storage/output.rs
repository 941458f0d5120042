//! Atomic output files.

use std::{
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;
use tracing::debug;

/// Writes `bytes` to `path`, replacing any existing file.
///
/// The bytes are written to a temporary file in the destination directory,
/// which is flushed and then renamed over the target. If anything fails the
/// temporary file is removed and the target is left untouched.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, written or
/// renamed.
pub fn write_document(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(bytes)?;
    file.as_file_mut().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}
