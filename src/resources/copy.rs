//! File copy resource.
use std::path::PathBuf;

use super::helpers::fs::{ensure_parent_dir, same_file};
use super::{Resource, ResourceChange};
use crate::error::InstallError;

/// Copy `source` to `target`, overwriting any existing file.
#[derive(Debug, Clone)]
pub struct CopyResource {
    /// File to copy.
    pub source: PathBuf,
    /// Destination path (including file name).
    pub target: PathBuf,
}

impl CopyResource {
    /// Create a new copy resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Resource for CopyResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange, InstallError> {
        if !self.source.exists() {
            return Err(InstallError::MissingFile {
                path: self.source.clone(),
            });
        }
        // Copying a file onto itself would truncate it.
        if same_file(&self.source, &self.target) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        ensure_parent_dir(&self.target)?;
        std::fs::copy(&self.source, &self.target)
            .map_err(|e| InstallError::io("copy to", &self.target, e))?;
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn copies_content() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.bin");
        std::fs::write(&src, b"payload").unwrap();
        let dst = dir.path().join("out").join("dst.bin");

        let change = CopyResource::new(src, dst.clone()).apply().unwrap();
        assert_eq!(change, ResourceChange::Applied);
        assert_eq!(std::fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn overwrites_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&dst, b"old contents").unwrap();

        CopyResource::new(src, dst.clone()).apply().unwrap();
        assert_eq!(std::fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn missing_source_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CopyResource::new(dir.path().join("nope"), dir.path().join("dst"))
            .apply()
            .unwrap_err();
        assert!(matches!(err, InstallError::MissingFile { .. }));
    }

    #[test]
    fn copy_onto_itself_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tool");
        std::fs::write(&file, b"keep me").unwrap();

        let change = CopyResource::new(file.clone(), file.clone()).apply().unwrap();
        assert_eq!(change, ResourceChange::AlreadyCorrect);
        assert_eq!(std::fs::read(&file).unwrap(), b"keep me");
    }

    #[test]
    fn description_names_both_paths() {
        let r = CopyResource::new(PathBuf::from("/a/x"), PathBuf::from("/b/x"));
        assert_eq!(r.description(), "/a/x -> /b/x");
    }
}
