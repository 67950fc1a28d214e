//! Whole-file writes with atomic finalize.
//!
//! Bytes go to `<final>.part` first and are renamed over the final path, so a
//! reader never sees a half-written document or image. An existing writable
//! file at the final path is replaced without warning; a read-only one is
//! refused, since the rename would otherwise bypass its permission bits.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.md` → `a.md.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `data` to `final_path` via a synced temp file and rename.
/// Permissions of an existing `final_path` carry over to the new file.
/// A read-only `final_path` fails with `PermissionDenied` before anything is written.
/// On error the temp file is removed and `final_path` is left as it was.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> io::Result<()> {
    if let Ok(meta) = std::fs::metadata(final_path) {
        if meta.permissions().readonly() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "destination is read-only",
            ));
        }
    }
    let tmp = temp_path(final_path);
    let result = write_and_rename(&tmp, final_path, data);
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_and_rename(tmp: &Path, final_path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(tmp)?;
    file.write_all(data)?;
    if let Ok(meta) = std::fs::metadata(final_path) {
        file.set_permissions(meta.permissions())?;
    }
    file.sync_all()?;
    drop(file);
    std::fs::rename(tmp, final_path)
}
