//! Per-user installation directories.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Installation roots derived from a home directory.
///
/// Constructed once at startup and passed to the
/// [`Installer`](crate::installer::Installer); never read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoots {
    /// Home directory the roots were derived from.
    pub home: PathBuf,
    /// Executables and `AppImage` launch links: `~/.local/bin`.
    pub bin_dir: PathBuf,
    /// Shared and static libraries: `~/.local/lib`.
    pub lib_dir: PathBuf,
    /// Copied `AppImage` bundles: `~/.local/share/appimages`.
    pub app_image_dir: PathBuf,
}

impl InstallRoots {
    /// Derive the roots under `home` without touching the filesystem.
    #[must_use]
    pub fn from_home(home: &Path) -> Self {
        let local = home.join(".local");
        Self {
            home: home.to_path_buf(),
            bin_dir: local.join("bin"),
            lib_dir: local.join("lib"),
            app_image_dir: local.join("share").join("appimages"),
        }
    }

    /// Resolve the home directory (`override_home` or `$HOME`), derive the
    /// roots, and make sure they exist.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined or a root
    /// directory cannot be created.
    pub fn resolve(override_home: Option<&Path>) -> Result<Self> {
        let home = match override_home {
            Some(path) => path.to_path_buf(),
            None => std::env::var_os("HOME")
                .filter(|h| !h.is_empty())
                .map(PathBuf::from)
                .ok_or_else(|| anyhow::anyhow!("HOME environment variable is not set"))?,
        };
        Self::from_home(&home).ensure()?;
        // Links must point at absolute targets.
        let home = dunce::canonicalize(&home)
            .with_context(|| format!("resolve home directory: {}", home.display()))?;
        Ok(Self::from_home(&home))
    }

    /// Root passed to `dpkg --root` for user-scoped package installs.
    #[must_use]
    pub fn deb_root(&self) -> PathBuf {
        self.home.join(".local")
    }

    /// Create every root directory that does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.bin_dir, &self.lib_dir, &self.app_image_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_home_derives_local_layout() {
        let roots = InstallRoots::from_home(Path::new("/home/u"));
        assert_eq!(roots.bin_dir, PathBuf::from("/home/u/.local/bin"));
        assert_eq!(roots.lib_dir, PathBuf::from("/home/u/.local/lib"));
        assert_eq!(
            roots.app_image_dir,
            PathBuf::from("/home/u/.local/share/appimages")
        );
        assert_eq!(roots.deb_root(), PathBuf::from("/home/u/.local"));
    }

    #[test]
    fn resolve_with_override_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let roots = InstallRoots::resolve(Some(tmp.path())).unwrap();
        assert!(roots.bin_dir.is_dir());
        assert!(roots.lib_dir.is_dir());
        assert!(roots.app_image_dir.is_dir());
        assert_eq!(roots.home, dunce::canonicalize(tmp.path()).unwrap());
    }

    #[test]
    fn resolve_canonicalizes_home() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("a")).unwrap();
        let dotted = tmp.path().join("a").join("..").join("home");
        let roots = InstallRoots::resolve(Some(&dotted)).unwrap();
        assert!(roots.home.is_absolute());
        assert!(roots.home.ends_with("home"));
        assert!(!roots.home.to_string_lossy().contains(".."));
    }

    #[test]
    fn ensure_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let roots = InstallRoots::from_home(tmp.path());
        roots.ensure().unwrap();
        roots.ensure().unwrap();
        assert!(roots.bin_dir.is_dir());
    }

    #[test]
    fn ensure_fails_when_home_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        let roots = InstallRoots::from_home(&file);
        let err = roots.ensure().unwrap_err();
        assert!(err.to_string().contains("create directory"));
    }
}
