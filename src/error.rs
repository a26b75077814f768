//! Error types for install actions.
//!
//! Install actions return [`InstallError`] values; the batch loop converts
//! them into per-file failures so no error escapes a single file. Setup code
//! at the command boundary uses [`anyhow::Error`] via the `?` operator.
//!
//! # Error taxonomy
//!
//! ```text
//! InstallError
//! ├── MissingFile      — source path does not exist
//! ├── Io               — copy, chmod, symlink, or remove failure
//! ├── CommandFailed    — package manager exited non-zero (after fallback)
//! └── UnknownFileType  — classifier could not determine a kind
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that arise while installing a single file.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The file to install does not exist.
    #[error("file does not exist: {}", .path.display())]
    MissingFile {
        /// Path that was requested.
        path: PathBuf,
    },

    /// A filesystem operation failed (permissions, disk, etc.).
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// Short description of the operation (e.g. `"copy to"`).
        action: &'static str,
        /// Path the operation acted on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully.
    #[error("command '{command}' failed ({})", exit_label(.code))]
    CommandFailed {
        /// Full command line that was run.
        command: String,
        /// Exit code, `None` if terminated by a signal or never spawned.
        code: Option<i32>,
    },

    /// The file type could not be determined.
    #[error("unknown file type: {}", .path.display())]
    UnknownFileType {
        /// Path that could not be classified.
        path: PathBuf,
    },
}

impl InstallError {
    /// Build an [`InstallError::Io`] for `path`.
    #[must_use]
    pub fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[allow(clippy::ref_option)]
fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "no exit code".to_string(), |c| format!("exit {c}"))
}
