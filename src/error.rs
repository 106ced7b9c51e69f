//! Unified error types for daemonhost

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for daemonhost operations
#[derive(Error, Debug)]
pub enum DaemonHostError {
    /// Not even the last-resort log directory could be created
    #[error("Log directory '{}' unavailable: {source}", path.display())]
    LogDirUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The worker executable could not be started
    #[error("Failed to spawn worker '{}': {source}", program.display())]
    WorkerSpawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// The OS refused to start the worker thread
    #[error("Failed to start worker thread: {0}")]
    WorkerThread(std::io::Error),

    /// The worker thread panicked
    #[error("Worker thread panicked")]
    WorkerPanicked,

    /// Generic I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for daemonhost operations
pub type Result<T> = std::result::Result<T, DaemonHostError>;

impl DaemonHostError {
    /// Create a log directory error with context
    pub fn log_dir_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LogDirUnavailable {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_error_message_names_path() {
        let err = DaemonHostError::log_dir_unavailable(
            "/tmp/nowhere",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/nowhere"));
        assert!(msg.contains("denied"));
    }
}
