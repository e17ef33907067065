//! Artifact export using `MessagePack`.
//!
//! Artifacts are serialized with field names so the game runtime can read
//! them without knowing the struct layout.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use taskforge_foundation::{Error, ErrorKind, Result};
use taskforge_interpreter::Artifacts;
use tracing::debug;

/// Serializes artifacts to bytes using `MessagePack` format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(artifacts: &Artifacts) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(artifacts)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Writes artifacts to a file, overwriting it if it exists.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(artifacts: &Artifacts, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(artifacts)?;
    let io_error = |action: &str, e: std::io::Error| {
        Error::new(ErrorKind::Io(format!(
            "failed to {action} file '{}': {e}",
            path.display()
        )))
    };

    let file = File::create(path).map_err(|e| io_error("create", e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(|e| io_error("write to", e))?;
    writer.flush().map_err(|e| io_error("flush", e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "exported artifacts");
    Ok(())
}
