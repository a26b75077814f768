//! Core logging types: per-file entries, status, and the [`Log`] trait.

/// Install outcome for summary reporting.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File as given on the command line.
    pub name: String,
    /// Final status of the install.
    pub status: InstallStatus,
    /// Optional detail message (destination or failure reason).
    pub message: Option<String>,
}

/// Status of a processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    /// File was installed.
    Installed,
    /// Install failed; see the entry message.
    Failed,
}

/// Abstraction over logging backends.
///
/// The [`Installer`](crate::installer::Installer) logs through this trait so
/// tests can capture output without a global subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (shown on the console only when verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a file outcome for the summary.
    fn record(&self, name: &str, status: InstallStatus, message: Option<&str>);
}
