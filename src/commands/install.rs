//! The `install` command: resolve roots, then install each file in order.
use anyhow::Result;

use crate::cli::{Cli, VERSION};
use crate::exec::{Executor, SystemExecutor};
use crate::installer::{InstallResult, Installer};
use crate::logging::Logger;
use crate::roots::InstallRoots;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the install roots cannot be resolved or created, or if
/// any file failed to install.
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    run_with(cli, &SystemExecutor, log)
}

/// Run the install command with an explicit command runner.
///
/// Files are processed in command-line order; a failure is logged and the
/// batch continues.
///
/// # Errors
///
/// Returns an error if the install roots cannot be resolved or created, or if
/// any file failed to install.
pub fn run_with(cli: &Cli, executor: &dyn Executor, log: &Logger) -> Result<()> {
    log.debug(&format!("installer {VERSION}"));
    let roots = InstallRoots::resolve(cli.home.as_deref())?;
    log.debug(&format!(
        "roots: bin={} lib={} appimages={}",
        roots.bin_dir.display(),
        roots.lib_dir.display(),
        roots.app_image_dir.display()
    ));

    let installer = Installer::new(roots, executor, log);
    let forced = cli.forced_kind();
    if let Some(kind) = forced {
        log.debug(&format!("forcing file type: {kind}"));
    }

    let mut failed = 0usize;
    for file in &cli.files {
        if cli.verbose {
            log.stage(&format!("Processing file: {}", file.display()));
        }
        match installer.install(file, forced) {
            InstallResult::Installed(_) => {
                if cli.verbose {
                    log.info(&format!("Successfully installed: {}", file.display()));
                }
            }
            InstallResult::Failed(_) => {
                failed += 1;
                log.error(&format!("Failed to install: {}", file.display()));
            }
        }
    }

    if cli.verbose {
        log.print_summary();
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed to install", cli.files.len());
    }
    Ok(())
}
