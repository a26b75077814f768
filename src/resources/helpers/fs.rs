//! File-system resource helpers.
use std::path::Path;

use crate::error::InstallError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), InstallError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| InstallError::io("create parent", parent, e))?;
    }
    Ok(())
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<(), InstallError> {
    if path.symlink_metadata().is_ok() {
        std::fs::remove_file(path).map_err(|e| InstallError::io("remove existing", path, e))?;
    }
    Ok(())
}

/// File name component of `path`, or an error naming the path.
///
/// # Errors
///
/// Returns an error if `path` ends in `..` or is a filesystem root.
pub fn file_name(path: &Path) -> Result<&std::ffi::OsStr, InstallError> {
    path.file_name().ok_or_else(|| {
        InstallError::io(
            "read file name of",
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })
}

/// Whether `a` and `b` resolve to the same existing file.
#[must_use]
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
