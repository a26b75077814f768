//! Symlink resource.
use std::path::{Path, PathBuf};

use super::helpers::fs::{ensure_parent_dir, remove_existing};
use super::{Resource, ResourceChange};
use crate::error::InstallError;

/// A symlink at `target` pointing to `source`.
///
/// Applying always replaces whatever file or link sits at `target`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// What the symlink points to.
    pub source: PathBuf,
    /// Where the symlink is created.
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Resource for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange, InstallError> {
        ensure_parent_dir(&self.target)?;
        remove_existing(&self.target)?;
        create_symlink(&self.source, &self.target)
            .map_err(|e| InstallError::io("create link", &self.target, e))?;
        Ok(ResourceChange::Applied)
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_file(target, link)
    }
}
