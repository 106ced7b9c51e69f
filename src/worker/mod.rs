//! The worker daemon collaborator
//!
//! The host never looks inside the worker. It hands over a log file path,
//! then a single command line, and the worker runs until the process goes
//! away.

mod process;

pub use process::{split_command_line, ProcessWorker, DEFAULT_WORKER_PROGRAM};

use std::path::Path;

/// Entry points exposed by the worker daemon
pub trait Worker: Send + Sync + 'static {
    /// Set where the worker writes its own log. Called before [`Worker::run`].
    fn set_log_file(&self, path: &Path);

    /// Run the worker's main loop with the composed command line.
    ///
    /// Blocks for the lifetime of the worker.
    fn run(&self, config: String);
}
