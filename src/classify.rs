//! File-type classification.
//!
//! Classification looks only at the path string and, for executables, the
//! owner-execute permission bit. File contents are never inspected.
use std::fmt;
use std::path::Path;

/// Owner-execute permission bit.
const OWNER_EXECUTE: u32 = 0o100;

/// Kind of installable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Debian package archive (`.deb`).
    DebPackage,
    /// Portable `AppImage` bundle.
    AppImage,
    /// Shared or static library.
    Library,
    /// Executable binary.
    Binary,
    /// Not recognized; cannot be installed automatically.
    Unknown,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DebPackage => write!(f, ".deb package"),
            Self::AppImage => write!(f, "AppImage"),
            Self::Library => write!(f, "library"),
            Self::Binary => write!(f, "binary"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify `path`.
///
/// Checks run in a fixed order (deb, `AppImage`, library, binary) and the
/// first match wins, so an executable `.so` is a [`FileKind::Library`].
#[must_use]
pub fn classify(path: &Path) -> FileKind {
    let name = path.to_string_lossy();
    if is_deb_package(&name) {
        FileKind::DebPackage
    } else if is_app_image(&name) {
        FileKind::AppImage
    } else if is_library(&name) {
        FileKind::Library
    } else if is_owner_executable(path) {
        FileKind::Binary
    } else {
        FileKind::Unknown
    }
}

fn is_deb_package(name: &str) -> bool {
    name.ends_with(".deb")
}

// Two exact spellings; `.APPIMAGE` or `.Appimage` are not recognized.
fn is_app_image(name: &str) -> bool {
    name.ends_with(".AppImage") || name.ends_with(".appimage")
}

fn is_library(name: &str) -> bool {
    name.ends_with(".so") || name.contains(".so.") || name.ends_with(".a")
}

#[cfg(unix)]
fn is_owner_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.permissions().mode() & OWNER_EXECUTE != 0)
}

#[cfg(not(unix))]
fn is_owner_executable(_path: &Path) -> bool {
    let _ = OWNER_EXECUTE;
    false
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[cfg(unix)]
    fn write_with_mode(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, b"\x7fELF").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn deb_without_file() {
        assert_eq!(classify(Path::new("/nowhere/pkg.deb")), FileKind::DebPackage);
    }

    #[cfg(unix)]
    #[test]
    fn deb_wins_over_execute_bit() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_with_mode(tmp.path(), "tool.deb", 0o755);
        assert_eq!(classify(&path), FileKind::DebPackage);
    }

    #[test]
    fn app_image_both_spellings() {
        assert_eq!(classify(Path::new("app.AppImage")), FileKind::AppImage);
        assert_eq!(classify(Path::new("app.appimage")), FileKind::AppImage);
    }

    #[test]
    fn app_image_other_case_is_not_recognized() {
        assert_eq!(classify(Path::new("app.APPIMAGE")), FileKind::Unknown);
    }

    #[test]
    fn library_patterns() {
        assert_eq!(classify(Path::new("libfoo.so")), FileKind::Library);
        assert_eq!(classify(Path::new("libfoo.so.1.2.3")), FileKind::Library);
        assert_eq!(classify(Path::new("libfoo.a")), FileKind::Library);
    }

    #[test]
    fn so_substring_anywhere_in_path_is_library() {
        assert_eq!(classify(Path::new("conf.so.d/tool")), FileKind::Library);
    }

    #[cfg(unix)]
    #[test]
    fn executable_library_stays_library() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_with_mode(tmp.path(), "libexec.so", 0o755);
        assert_eq!(classify(&path), FileKind::Library);
    }

    #[cfg(unix)]
    #[test]
    fn owner_executable_is_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_with_mode(tmp.path(), "tool", 0o744);
        assert_eq!(classify(&path), FileKind::Binary);
    }

    #[cfg(unix)]
    #[test]
    fn group_executable_only_is_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_with_mode(tmp.path(), "tool", 0o654);
        assert_eq!(classify(&path), FileKind::Unknown);
    }

    #[test]
    fn missing_file_without_extension_is_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(classify(&tmp.path().join("ghost")), FileKind::Unknown);
    }

    #[test]
    fn display_names() {
        assert_eq!(FileKind::DebPackage.to_string(), ".deb package");
        assert_eq!(FileKind::AppImage.to_string(), "AppImage");
        assert_eq!(FileKind::Library.to_string(), "library");
        assert_eq!(FileKind::Binary.to_string(), "binary");
        assert_eq!(FileKind::Unknown.to_string(), "unknown");
    }
}
