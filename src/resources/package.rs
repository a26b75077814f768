//! Debian package installation resource.
use std::path::PathBuf;

use super::{Resource, ResourceChange};
use crate::error::InstallError;
use crate::exec::Executor;

/// Where a `.deb` package is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageScope {
    /// Unprivileged install into an alternate dpkg root.
    User {
        /// Directory passed to `dpkg --root`.
        root: PathBuf,
    },
    /// System-wide install through `sudo`.
    System,
}

/// A `.deb` package installed with `dpkg`.
#[derive(Debug)]
pub struct DebPackageResource<'a> {
    /// Path to the `.deb` archive.
    pub package: PathBuf,
    /// Install scope.
    pub scope: PackageScope,
    executor: &'a dyn Executor,
}

impl<'a> DebPackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(package: PathBuf, scope: PackageScope, executor: &'a dyn Executor) -> Self {
        Self {
            package,
            scope,
            executor,
        }
    }

    /// Program and arguments for this scope.
    #[must_use]
    pub fn command(&self) -> (&'static str, Vec<String>) {
        let package = self.package.to_string_lossy().into_owned();
        match &self.scope {
            PackageScope::User { root } => (
                "dpkg",
                vec![
                    "-i".to_string(),
                    "--force-not-root".to_string(),
                    format!("--root={}", root.display()),
                    package,
                ],
            ),
            PackageScope::System => (
                "sudo",
                vec!["dpkg".to_string(), "-i".to_string(), package],
            ),
        }
    }
}

impl Resource for DebPackageResource<'_> {
    fn description(&self) -> String {
        let (program, args) = self.command();
        format!("{program} {}", args.join(" "))
    }

    fn apply(&self) -> Result<ResourceChange, InstallError> {
        let (program, args) = self.command();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let result = match self.scope {
            PackageScope::User { .. } => self.executor.run_unchecked(program, &args),
            // sudo may need to prompt for a password.
            PackageScope::System => self.executor.run_interactive(program, &args),
        };

        match result {
            Ok(r) if r.success => Ok(ResourceChange::Applied),
            Ok(r) => {
                if !r.stderr.trim().is_empty() {
                    tracing::debug!("{program}: {}", r.stderr.trim());
                }
                Err(InstallError::CommandFailed {
                    command: self.description(),
                    code: r.code,
                })
            }
            Err(e) => {
                tracing::debug!("{e:#}");
                Err(InstallError::CommandFailed {
                    command: self.description(),
                    code: None,
                })
            }
        }
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

    fn user_scope() -> PackageScope {
        PackageScope::User {
            root: PathBuf::from("/home/u/.local"),
        }
    }

    #[test]
    fn user_command_uses_alternate_root() {
        let mock = MockExecutor::with_exit_codes(&[]);
        let r = DebPackageResource::new(PathBuf::from("pkg.deb"), user_scope(), &mock);
        assert_eq!(
            r.description(),
            "dpkg -i --force-not-root --root=/home/u/.local pkg.deb"
        );
    }

    #[test]
    fn system_command_uses_sudo() {
        let mock = MockExecutor::with_exit_codes(&[]);
        let r = DebPackageResource::new(PathBuf::from("pkg.deb"), PackageScope::System, &mock);
        assert_eq!(r.description(), "sudo dpkg -i pkg.deb");
    }

    #[test]
    fn user_install_success() {
        let mock = MockExecutor::with_exit_codes(&[0]);
        let r = DebPackageResource::new(PathBuf::from("pkg.deb"), user_scope(), &mock);
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "run_unchecked");
        assert_eq!(calls[0].1, "dpkg");
    }

    #[test]
    fn system_install_runs_interactively() {
        let mock = MockExecutor::with_exit_codes(&[0]);
        let r = DebPackageResource::new(PathBuf::from("pkg.deb"), PackageScope::System, &mock);
        r.apply().unwrap();
        assert_eq!(mock.calls()[0].0, "run_interactive");
    }

    #[test]
    fn nonzero_exit_is_command_failed() {
        let mock = MockExecutor::with_exit_codes(&[2]);
        let r = DebPackageResource::new(PathBuf::from("pkg.deb"), user_scope(), &mock);
        match r.apply().unwrap_err() {
            InstallError::CommandFailed { command, code } => {
                assert!(command.starts_with("dpkg -i"));
                assert_eq!(code, Some(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn spawn_error_is_command_failed_without_code() {
        let mock = MockExecutor::with_outcomes(vec![MockOutcome::SpawnError]);
        let r = DebPackageResource::new(PathBuf::from("pkg.deb"), user_scope(), &mock);
        assert!(matches!(
            r.apply().unwrap_err(),
            InstallError::CommandFailed { code: None, .. }
        ));
    }

    #[test]
    fn sudo_spawn_error_reports_missing_exit_code() {
        let mock = MockExecutor::with_outcomes(vec![MockOutcome::SpawnError]);
        let r = DebPackageResource::new(PathBuf::from("pkg.deb"), PackageScope::System, &mock);
        let msg = r.apply().unwrap_err().to_string();
        assert_eq!(msg, "command 'sudo dpkg -i pkg.deb' failed (no exit code)");
        assert!(!msg.contains("signal"));
    }
}
