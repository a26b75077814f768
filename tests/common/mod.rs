// Shared helpers for integration tests.
//
// Provides a temporary home directory, a separate source directory for files
// to install, and a runner for the compiled `installer` binary that points
// `HOME` and `XDG_CACHE_HOME` at the temporary tree.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// An isolated home and source tree backed by [`tempfile::TempDir`]s.
///
/// Both directories are deleted when the context is dropped.
pub struct IntegrationTestContext {
    /// Home directory the install roots are derived from.
    pub home: tempfile::TempDir,
    /// Directory holding the files handed to the installer.
    pub src: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with empty home and source directories.
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create home dir"),
            src: tempfile::tempdir().expect("create source dir"),
        }
    }

    /// Path to the home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// `<home>/.local/<rel>`.
    pub fn local(&self, rel: &str) -> PathBuf {
        self.home.path().join(".local").join(rel)
    }

    /// Write `contents` to `<src>/<name>` and return its path.
    pub fn write_source(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.src.path().join(name);
        std::fs::write(&path, contents).expect("write source file");
        path
    }

    /// Write an owner-executable source file.
    #[cfg(unix)]
    pub fn write_executable(&self, name: &str, contents: &[u8]) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.write_source(name, contents);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o744))
            .expect("chmod source file");
        path
    }

    /// Run the `installer` binary with `args` inside this context.
    pub fn run<I, S>(&self, args: I) -> Output
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.command(args).output().expect("run installer binary")
    }

    /// Run the `installer` binary with the source directory as the working
    /// directory, so files can be named relative to it.
    pub fn run_in_src<I, S>(&self, args: I) -> Output
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.command(args)
            .current_dir(self.src.path())
            .output()
            .expect("run installer binary")
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_installer"));
        cmd.args(args)
            .env("HOME", self.home.path())
            .env("XDG_CACHE_HOME", self.home.path().join(".cache"))
            .env_remove("INSTALLER_VERSION");
        cmd
    }

    /// Persistent log written by the last run.
    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(self.home.path().join(".cache/installer/install.log"))
            .unwrap_or_default()
    }
}
