//! Filesystem helpers for copying the store image around.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Rename a file, with fallback for platforms where rename fails if the target exists.
///
/// If the rename ultimately fails, the temp file is cleaned up.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        // Best-effort replace on platforms where rename fails if target exists.
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Replace `destination` with a copy of `source`.
///
/// The bytes are first written to a temp file beside the destination and then
/// renamed over it, so readers never observe a half-written image.
pub fn replace_with_copy(source: &Path, destination: &Path) -> io::Result<u64> {
    let parent = destination.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "Destination has no parent")
    })?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
        .as_nanos();
    let temp_path = parent.join(format!(".fleet-restore-{}.tmp", nanos));

    let bytes = match fs::copy(source, &temp_path) {
        Ok(bytes) => bytes,
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
    };
    rename_with_fallback(&temp_path, destination)?;
    Ok(bytes)
}

/// Copy `source` to `destination` only if `destination` does not exist yet.
///
/// Returns `Ok(None)` when the destination already exists. The existence check
/// and the file creation are a single `create_new` call.
pub fn copy_to_new(source: &Path, destination: &Path) -> io::Result<Option<u64>> {
    let mut target = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(None),
        Err(err) => return Err(err),
    };

    let copied = File::open(source).and_then(|mut input| io::copy(&mut input, &mut target));
    match copied {
        Ok(bytes) => {
            target.sync_all()?;
            Ok(Some(bytes))
        }
        Err(err) => {
            drop(target);
            let _ = fs::remove_file(destination);
            Err(err)
        }
    }
}
