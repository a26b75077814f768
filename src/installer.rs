//! Install actions and classification dispatch.
//!
//! Every action verifies its source exists, applies a short sequence of
//! [`resources`](crate::resources), and returns an explicit [`Result`].
//! [`Installer::install`] is the per-file boundary: it turns that result into
//! an [`InstallResult`], logs it, and records it for the summary.
use std::path::{Path, PathBuf};

use crate::classify::{FileKind, classify};
use crate::error::InstallError;
use crate::exec::Executor;
use crate::logging::{InstallStatus, Log};
use crate::resources::chmod::{ChmodResource, EXECUTABLE_MODE};
use crate::resources::copy::CopyResource;
use crate::resources::helpers::fs::file_name;
use crate::resources::package::{DebPackageResource, PackageScope};
use crate::resources::symlink::SymlinkResource;
use crate::resources::Resource;
use crate::roots::InstallRoots;

/// Details of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installed {
    /// Kind the file was installed as.
    pub kind: FileKind,
    /// Installed copy; `None` for packages handed to dpkg.
    pub destination: Option<PathBuf>,
    /// Launch link created in the bin directory (`AppImage` only).
    pub link: Option<PathBuf>,
    /// Whether the install needed the system-wide `sudo` fallback.
    pub escalated: bool,
}

impl Installed {
    fn copied(kind: FileKind, destination: PathBuf) -> Self {
        Self {
            kind,
            destination: Some(destination),
            link: None,
            escalated: false,
        }
    }
}

/// Outcome of installing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallResult {
    /// The file was installed.
    Installed(Installed),
    /// The install failed with the given reason.
    Failed(String),
}

impl InstallResult {
    /// Whether the install succeeded.
    #[must_use]
    pub const fn is_installed(&self) -> bool {
        matches!(self, Self::Installed(_))
    }
}

/// Installs files into the per-user roots.
pub struct Installer<'a> {
    roots: InstallRoots,
    executor: &'a dyn Executor,
    log: &'a dyn Log,
}

impl std::fmt::Debug for Installer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("roots", &self.roots)
            .field("executor", &self.executor)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl<'a> Installer<'a> {
    /// Create an installer over already-resolved roots.
    #[must_use]
    pub const fn new(roots: InstallRoots, executor: &'a dyn Executor, log: &'a dyn Log) -> Self {
        Self {
            roots,
            executor,
            log,
        }
    }

    /// Install `path` as `forced` if given, otherwise as its classified kind.
    ///
    /// Never fails: errors are logged and returned as
    /// [`InstallResult::Failed`].
    pub fn install(&self, path: &Path, forced: Option<FileKind>) -> InstallResult {
        let outcome = match forced {
            Some(kind) => self.install_as(path, kind),
            None => self.auto_install(path),
        };
        let name = path.display().to_string();

        match outcome {
            Ok(installed) => {
                let detail = installed
                    .link
                    .as_ref()
                    .or_else(|| installed.destination.as_ref())
                    .map(|p| p.display().to_string());
                self.log
                    .record(&name, InstallStatus::Installed, detail.as_deref());
                InstallResult::Installed(installed)
            }
            Err(e) => {
                let reason = e.to_string();
                self.log.error(&reason);
                self.log.record(&name, InstallStatus::Failed, Some(&reason));
                InstallResult::Failed(reason)
            }
        }
    }

    /// Classify `path` and dispatch to the matching action.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::UnknownFileType`] if the file cannot be
    /// classified, or the error of the dispatched action.
    pub fn auto_install(&self, path: &Path) -> Result<Installed, InstallError> {
        let kind = classify(path);
        self.log
            .debug(&format!("classified {} as {kind}", path.display()));
        self.install_as(path, kind)
    }

    /// Install `path` as `kind`, bypassing classification.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::UnknownFileType`] for [`FileKind::Unknown`], or
    /// the error of the dispatched action.
    pub fn install_as(&self, path: &Path, kind: FileKind) -> Result<Installed, InstallError> {
        match kind {
            FileKind::DebPackage => self.install_deb_package(path),
            FileKind::AppImage => self.install_app_image(path),
            FileKind::Library => self.install_library(path),
            FileKind::Binary => self.install_binary(path),
            FileKind::Unknown => Err(InstallError::UnknownFileType {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Install a `.deb` package into the user-scoped dpkg root, falling back
    /// to a system-wide `sudo dpkg -i` if that fails.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::MissingFile`] if the package does not exist, or
    /// [`InstallError::CommandFailed`] if both attempts fail.
    pub fn install_deb_package(&self, path: &Path) -> Result<Installed, InstallError> {
        self.log
            .info(&format!("Installing {}: {}", FileKind::DebPackage, path.display()));
        require_exists(path)?;

        if !self.executor.which("dpkg") {
            self.log.warn("dpkg not found on PATH");
        }

        let user = DebPackageResource::new(
            path.to_path_buf(),
            PackageScope::User {
                root: self.roots.deb_root(),
            },
            self.executor,
        );
        self.log.debug(&user.description());
        if user.apply().is_ok() {
            self.log.info(&format!(
                "Package installed under: {}",
                self.roots.deb_root().display()
            ));
            return Ok(Installed {
                kind: FileKind::DebPackage,
                destination: None,
                link: None,
                escalated: false,
            });
        }

        self.log
            .warn("User-level installation failed, trying with sudo...");
        let system = DebPackageResource::new(path.to_path_buf(), PackageScope::System, self.executor);
        self.log.debug(&system.description());
        system.apply()?;
        self.log.info("Package installed system-wide");
        Ok(Installed {
            kind: FileKind::DebPackage,
            destination: None,
            link: None,
            escalated: true,
        })
    }

    /// Copy an `AppImage` into the `AppImage` directory, make it executable,
    /// and link it into the bin directory under its name without extension.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::MissingFile`] if the file does not exist, or
    /// [`InstallError::Io`] if copying, chmod, or linking fails.
    pub fn install_app_image(&self, path: &Path) -> Result<Installed, InstallError> {
        self.log
            .info(&format!("Installing {}: {}", FileKind::AppImage, path.display()));
        require_exists(path)?;

        let name = file_name(path)?;
        let destination = self.roots.app_image_dir.join(name);
        CopyResource::new(path.to_path_buf(), destination.clone()).apply()?;
        ChmodResource::new(destination.clone(), EXECUTABLE_MODE).apply()?;

        let stem = Path::new(name).file_stem().unwrap_or(name);
        let link = self.roots.bin_dir.join(stem);
        SymlinkResource::new(destination.clone(), link.clone()).apply()?;

        self.log.info(&format!(
            "AppImage installed successfully to: {}",
            destination.display()
        ));
        self.log
            .info(&format!("Executable link created at: {}", link.display()));
        Ok(Installed {
            kind: FileKind::AppImage,
            destination: Some(destination),
            link: Some(link),
            escalated: false,
        })
    }

    /// Copy an executable into the bin directory and make it executable.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::MissingFile`] if the file does not exist, or
    /// [`InstallError::Io`] if copying or chmod fails.
    pub fn install_binary(&self, path: &Path) -> Result<Installed, InstallError> {
        self.log
            .info(&format!("Installing {}: {}", FileKind::Binary, path.display()));
        require_exists(path)?;

        let destination = self.roots.bin_dir.join(file_name(path)?);
        CopyResource::new(path.to_path_buf(), destination.clone()).apply()?;
        ChmodResource::new(destination.clone(), EXECUTABLE_MODE).apply()?;

        self.log.info(&format!(
            "Binary installed successfully to: {}",
            destination.display()
        ));
        Ok(Installed::copied(FileKind::Binary, destination))
    }

    /// Copy a library into the lib directory, keeping its permissions.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::MissingFile`] if the file does not exist, or
    /// [`InstallError::Io`] if copying fails.
    pub fn install_library(&self, path: &Path) -> Result<Installed, InstallError> {
        self.log
            .info(&format!("Installing {}: {}", FileKind::Library, path.display()));
        require_exists(path)?;

        let destination = self.roots.lib_dir.join(file_name(path)?);
        CopyResource::new(path.to_path_buf(), destination.clone()).apply()?;

        self.log.info(&format!(
            "Library installed successfully to: {}",
            destination.display()
        ));
        Ok(Installed::copied(FileKind::Library, destination))
    }
}

fn require_exists(path: &Path) -> Result<(), InstallError> {
    if path.exists() {
        Ok(())
    } else {
        Err(InstallError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::{MockExecutor, MockOutcome};
    use std::sync::Mutex;

    /// Captures log calls for assertions.
    #[derive(Debug, Default)]
    struct CaptureLog {
        lines: Mutex<Vec<(String, String)>>,
        records: Mutex<Vec<(String, InstallStatus)>>,
    }

    impl CaptureLog {
        fn push(&self, level: &str, msg: &str) {
            self.lines
                .lock()
                .unwrap()
                .push((level.to_string(), msg.to_string()));
        }

        fn contains(&self, level: &str, needle: &str) -> bool {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .any(|(l, m)| l == level && m.contains(needle))
        }
    }

    impl Log for CaptureLog {
        fn stage(&self, msg: &str) {
            self.push("stage", msg);
        }
        fn info(&self, msg: &str) {
            self.push("info", msg);
        }
        fn debug(&self, msg: &str) {
            self.push("debug", msg);
        }
        fn warn(&self, msg: &str) {
            self.push("warn", msg);
        }
        fn error(&self, msg: &str) {
            self.push("error", msg);
        }
        fn record(&self, name: &str, status: InstallStatus, _message: Option<&str>) {
            self.records
                .lock()
                .unwrap()
                .push((name.to_string(), status));
        }
    }

    struct Fixture {
        home: tempfile::TempDir,
        src: tempfile::TempDir,
        roots: InstallRoots,
    }

    impl Fixture {
        fn new() -> Self {
            let home = tempfile::tempdir().unwrap();
            let src = tempfile::tempdir().unwrap();
            let roots = InstallRoots::resolve(Some(home.path())).unwrap();
            Self { home, src, roots }
        }

        fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
            let path = self.src.path().join(name);
            std::fs::write(&path, contents).unwrap();
            path
        }
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path).unwrap().permissions().mode() & 0o7777
    }

    #[cfg(unix)]
    fn set_mode(path: &Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn app_image_is_copied_chmodded_and_linked() {
        let fx = Fixture::new();
        let src = fx.file("app.AppImage", b"bundle");
        let exec = MockExecutor::with_exit_codes(&[]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        let installed = installer.install_app_image(&src).unwrap();
        let dest = fx.roots.app_image_dir.join("app.AppImage");
        let link = fx.roots.bin_dir.join("app");

        assert_eq!(installed.destination.as_deref(), Some(dest.as_path()));
        assert_eq!(installed.link.as_deref(), Some(link.as_path()));
        assert_eq!(std::fs::read(&dest).unwrap(), b"bundle");
        assert_eq!(mode_of(&dest), 0o755);
        assert_eq!(std::fs::read_link(&link).unwrap(), dest);
        assert!(log.contains("info", "Executable link created at"));
        assert_eq!(exec.call_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn app_image_reinstall_overwrites_and_keeps_one_link() {
        let fx = Fixture::new();
        let src = fx.file("tool.appimage", b"v1");
        let exec = MockExecutor::with_exit_codes(&[]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        installer.install_app_image(&src).unwrap();
        std::fs::write(&src, b"v2").unwrap();
        installer.install_app_image(&src).unwrap();

        let dest = fx.roots.app_image_dir.join("tool.appimage");
        assert_eq!(std::fs::read(&dest).unwrap(), b"v2");
        let links: Vec<_> = std::fs::read_dir(&fx.roots.bin_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(links, vec![fx.roots.bin_dir.join("tool")]);
        assert_eq!(std::fs::read_link(&links[0]).unwrap(), dest);
    }

    #[cfg(unix)]
    #[test]
    fn binary_is_copied_with_executable_mode() {
        let fx = Fixture::new();
        let src = fx.file("tool", b"#!/bin/sh\n");
        set_mode(&src, 0o700);
        let exec = MockExecutor::with_exit_codes(&[]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        let installed = installer.install_binary(&src).unwrap();
        let dest = fx.roots.bin_dir.join("tool");
        assert_eq!(installed, Installed::copied(FileKind::Binary, dest.clone()));
        assert_eq!(mode_of(&dest), 0o755);
    }

    #[cfg(unix)]
    #[test]
    fn library_keeps_copied_permissions() {
        let fx = Fixture::new();
        let src = fx.file("libfoo.so.1", b"lib");
        set_mode(&src, 0o640);
        let exec = MockExecutor::with_exit_codes(&[]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        installer.install_library(&src).unwrap();
        let dest = fx.roots.lib_dir.join("libfoo.so.1");
        assert_eq!(std::fs::read(&dest).unwrap(), b"lib");
        assert_eq!(mode_of(&dest), 0o640);
    }

    #[test]
    fn every_action_fails_fast_on_missing_file() {
        let fx = Fixture::new();
        let missing = fx.src.path().join("gone");
        let exec = MockExecutor::with_exit_codes(&[]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        for kind in [
            FileKind::DebPackage,
            FileKind::AppImage,
            FileKind::Binary,
            FileKind::Library,
        ] {
            let err = installer.install_as(&missing, kind).unwrap_err();
            assert!(
                matches!(err, InstallError::MissingFile { .. }),
                "{kind}: unexpected {err}"
            );
        }
        assert_eq!(exec.call_count(), 0, "dpkg must not run for a missing file");
    }

    #[test]
    fn deb_user_install_success_runs_once() {
        let fx = Fixture::new();
        let pkg = fx.file("pkg.deb", b"!<arch>");
        let exec = MockExecutor::with_exit_codes(&[0]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        let installed = installer.install_deb_package(&pkg).unwrap();
        assert!(!installed.escalated);

        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "dpkg");
        assert_eq!(
            calls[0].2,
            vec![
                "-i".to_string(),
                "--force-not-root".to_string(),
                format!("--root={}", fx.roots.deb_root().display()),
                pkg.display().to_string(),
            ]
        );
    }

    #[test]
    fn deb_falls_back_to_sudo() {
        let fx = Fixture::new();
        let pkg = fx.file("pkg.deb", b"!<arch>");
        let exec = MockExecutor::with_exit_codes(&[1, 0]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        let installed = installer.install_deb_package(&pkg).unwrap();
        assert!(installed.escalated);

        let calls = exec.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, "run_interactive");
        assert_eq!(calls[1].1, "sudo");
        assert_eq!(
            calls[1].2,
            vec!["dpkg".to_string(), "-i".to_string(), pkg.display().to_string()]
        );
        assert!(log.contains("warn", "trying with sudo"));
    }

    #[test]
    fn deb_falls_back_when_dpkg_cannot_spawn() {
        let fx = Fixture::new();
        let pkg = fx.file("pkg.deb", b"!<arch>");
        let exec = MockExecutor::with_outcomes(vec![MockOutcome::SpawnError, MockOutcome::Exit(0)])
            .with_which(false);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        assert!(installer.install_deb_package(&pkg).unwrap().escalated);
        assert!(log.contains("warn", "dpkg not found"));
    }

    #[test]
    fn deb_both_attempts_failing_is_command_failed() {
        let fx = Fixture::new();
        let pkg = fx.file("pkg.deb", b"!<arch>");
        let exec = MockExecutor::with_exit_codes(&[1, 1]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        let err = installer.install_deb_package(&pkg).unwrap_err();
        match err {
            InstallError::CommandFailed { command, code } => {
                assert!(command.starts_with("sudo dpkg -i"));
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(exec.call_count(), 2, "exactly one fallback attempt");
    }

    #[test]
    fn unknown_kind_is_not_installed() {
        let fx = Fixture::new();
        let src = fx.file("notes.txt", b"hello");
        let exec = MockExecutor::with_exit_codes(&[]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        let err = installer.auto_install(&src).unwrap_err();
        assert!(matches!(err, InstallError::UnknownFileType { .. }));
        assert!(std::fs::read_dir(&fx.roots.bin_dir).unwrap().next().is_none());
        assert!(std::fs::read_dir(&fx.roots.lib_dir).unwrap().next().is_none());
    }

    #[test]
    fn forced_library_bypasses_classification() {
        let fx = Fixture::new();
        let src = fx.file("foo.bin", b"\x00\x01arbitrary");
        let exec = MockExecutor::with_exit_codes(&[]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        let result = installer.install(&src, Some(FileKind::Library));
        assert!(result.is_installed());
        assert_eq!(
            std::fs::read(fx.roots.lib_dir.join("foo.bin")).unwrap(),
            b"\x00\x01arbitrary"
        );
    }

    #[test]
    fn install_converts_errors_and_records() {
        let fx = Fixture::new();
        let exec = MockExecutor::with_exit_codes(&[]);
        let log = CaptureLog::default();
        let installer = Installer::new(fx.roots.clone(), &exec, &log);

        let missing = fx.home.path().join("missing.AppImage");
        let result = installer.install(&missing, None);
        match &result {
            InstallResult::Failed(reason) => assert!(reason.contains("file does not exist")),
            InstallResult::Installed(_) => panic!("expected failure"),
        }
        assert!(log.contains("error", "file does not exist"));
        let records = log.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].1, InstallStatus::Failed);
    }
}
