//! Per-user package installer.
//!
//! Installs `.deb` packages, `AppImage` bundles, standalone executables, and
//! shared or static libraries into the invoking user's home directory, without
//! requiring root unless a package install has to fall back to `sudo`.
//!
//! The public API is organised into layers:
//!
//! - **[`classify`]**: decide what kind of file a path is
//! - **[`resources`]**: single-step primitives (copy, chmod, symlink, dpkg)
//! - **[`installer`]**: install actions composed from resources
//! - **[`commands`]**: batch orchestration behind the CLI
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod classify;
pub mod cli;
pub mod commands;
pub mod error;
pub mod exec;
pub mod installer;
pub mod logging;
pub mod resources;
pub mod roots;
