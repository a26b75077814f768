//! Filesystem and package primitives used by the install actions.
//!
//! Each primitive describes itself and applies one change. They carry no
//! policy: which primitives run, in what order, and with what fallback is
//! decided by the [`Installer`](crate::installer::Installer).
pub mod chmod;
pub mod copy;
pub mod helpers;
pub mod package;
pub mod symlink;

use crate::error::InstallError;

/// A single change that can be described and applied.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the change.
    ///
    /// # Errors
    ///
    /// Returns an [`InstallError`] if the change cannot be applied.
    fn apply(&self) -> Result<ResourceChange, InstallError>;
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use local_installer::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// assert_ne!(applied, ResourceChange::AlreadyCorrect);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Nothing to do (e.g. source and destination are the same file).
    AlreadyCorrect,
}
