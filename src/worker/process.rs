//! Worker adapter that runs the daemon as a child process

use crate::error::{DaemonHostError, Result};
use crate::worker::Worker;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, error, info};

/// File name of the worker executable looked up next to the host
#[cfg(windows)]
pub const DEFAULT_WORKER_PROGRAM: &str = "daemon-worker.exe";

/// File name of the worker executable looked up next to the host
#[cfg(not(windows))]
pub const DEFAULT_WORKER_PROGRAM: &str = "daemon-worker";

/// Runs the worker executable, appending its output to the log file
#[derive(Debug)]
pub struct ProcessWorker {
    program: PathBuf,
    log_file: Mutex<Option<PathBuf>>,
}

impl ProcessWorker {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            log_file: Mutex::new(None),
        }
    }

    /// Path of the worker executable
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Log file recorded by [`Worker::set_log_file`], if any
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file.lock().clone()
    }

    fn run_child(&self, config: &str) -> Result<ExitStatus> {
        // Token 0 is the identity token standing in for argv[0]
        let args = split_command_line(config);
        let mut command = Command::new(&self.program);
        command.args(args.iter().skip(1)).stdin(Stdio::null());

        if let Some(path) = self.log_file() {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            command.stdout(file.try_clone()?).stderr(file);
        }

        debug!(
            "Spawning worker {:?} with {:?}",
            self.program,
            args.get(1..).unwrap_or_default()
        );

        let mut child = command.spawn().map_err(|e| DaemonHostError::WorkerSpawn {
            program: self.program.clone(),
            source: e,
        })?;

        Ok(child.wait()?)
    }
}

impl Worker for ProcessWorker {
    fn set_log_file(&self, path: &Path) {
        info!("Worker log file: {:?}", path);
        *self.log_file.lock() = Some(path.to_path_buf());
    }

    fn run(&self, config: String) {
        match self.run_child(&config) {
            Ok(status) => info!("Worker exited with {}", status),
            Err(e) => error!("Worker failed: {}", e),
        }
    }
}

/// Split a command line on whitespace, keeping double-quoted runs together.
///
/// Quote characters are removed from the resulting tokens.
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}
