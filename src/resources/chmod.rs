//! File permission resource.
use std::path::PathBuf;

use super::{Resource, ResourceChange};
use crate::error::InstallError;

/// Owner rwx, group r-x, other r-x.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Set the permission bits of a file (Unix only).
#[derive(Debug, Clone)]
pub struct ChmodResource {
    /// Target file path.
    pub target: PathBuf,
    /// Permission mode (e.g. `0o755`).
    pub mode: u32,
}

impl ChmodResource {
    /// Create a new chmod resource.
    #[must_use]
    pub const fn new(target: PathBuf, mode: u32) -> Self {
        Self { target, mode }
    }
}

impl Resource for ChmodResource {
    fn description(&self) -> String {
        format!("{:o} {}", self.mode, self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange, InstallError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let perms = std::fs::Permissions::from_mode(self.mode);
            std::fs::set_permissions(&self.target, perms)
                .map_err(|e| InstallError::io("set permissions on", &self.target, e))?;
            Ok(ResourceChange::Applied)
        }

        #[cfg(not(unix))]
        {
            Ok(ResourceChange::AlreadyCorrect)
        }
    }
}
