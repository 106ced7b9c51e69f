//! Start sequence: resolve the worker's inputs, then hand off to it

use crate::error::{DaemonHostError, Result};
use crate::launch::environment::EnvironmentView;
use crate::launch::fallback::{derive_default_dir, FallbackPolicy, LogDirs};
use crate::launch::log_name::log_file_name;
use crate::launch::scan::{compose_config, scan_arguments};
use crate::worker::Worker;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Name of the thread running the worker's main loop
pub const WORKER_THREAD_NAME: &str = "daemon-worker";

/// Everything the worker needs, resolved once per start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Existing directory the log file lives in
    pub log_dir: PathBuf,
    /// Full path of the worker's log file
    pub log_file: PathBuf,
    /// Command line passed to the worker's main loop
    pub config: String,
}

/// The launched worker thread
///
/// Nothing signals the worker to stop; the handle only allows observing or
/// awaiting it.
#[derive(Debug)]
pub struct LaunchHandle {
    plan: LaunchPlan,
    thread: JoinHandle<()>,
}

impl LaunchHandle {
    /// The plan the worker was started with
    pub fn plan(&self) -> &LaunchPlan {
        &self.plan
    }

    /// Whether the worker's main loop has returned
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the worker's main loop returns
    pub fn join(self) -> Result<()> {
        self.thread
            .join()
            .map_err(|_| DaemonHostError::WorkerPanicked)
    }
}

/// Resolves the worker's log file and command line and starts it
#[derive(Debug, Clone)]
pub struct StartupOrchestrator {
    identity: String,
    exe_path: PathBuf,
    policy: FallbackPolicy,
}

impl StartupOrchestrator {
    /// Create an orchestrator for a host invoked as `identity` from `exe_path`
    pub fn new(identity: impl Into<String>, exe_path: impl Into<PathBuf>) -> Self {
        Self {
            identity: identity.into(),
            exe_path: exe_path.into(),
            policy: FallbackPolicy::default(),
        }
    }

    /// Replace the last-resort log directory
    pub fn with_fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.policy = FallbackPolicy::new(dir);
        self
    }

    /// Identity token placed at the front of the worker's command line
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Resolve the launch plan using the current local time
    pub fn resolve<S: AsRef<str>>(
        &self,
        dirs: &dyn LogDirs,
        args: &[S],
        env: &EnvironmentView,
    ) -> Result<LaunchPlan> {
        self.resolve_at(dirs, args, env, chrono::Local::now().naive_local())
    }

    /// Resolve the launch plan, naming the log file after `now`.
    ///
    /// Creates the log directory if needed. Fails only when not even the
    /// last-resort directory is usable.
    pub fn resolve_at<S: AsRef<str>>(
        &self,
        dirs: &dyn LogDirs,
        args: &[S],
        env: &EnvironmentView,
        now: NaiveDateTime,
    ) -> Result<LaunchPlan> {
        let scan = scan_arguments(args, env.log_path.as_deref());
        debug!(
            "Scanned {} arguments, {} residual",
            args.len(),
            scan.residual.len()
        );

        let derived = derive_default_dir(&self.identity, &self.exe_path);
        let log_dir = self.policy.resolve(dirs, scan.log_path, &derived)?;
        let log_file = log_dir.join(log_file_name(now));
        let config = compose_config(&self.identity, &scan.residual, env.options.as_deref());

        Ok(LaunchPlan {
            log_dir,
            log_file,
            config,
        })
    }

    /// Run the full start sequence and return without waiting for the worker.
    ///
    /// On error the worker is never touched.
    pub fn start<S: AsRef<str>>(
        &self,
        dirs: &dyn LogDirs,
        args: &[S],
        env: &EnvironmentView,
        worker: Arc<dyn Worker>,
    ) -> Result<LaunchHandle> {
        let plan = self.resolve(dirs, args, env)?;
        launch(plan, worker)
    }
}

/// Hand a resolved plan to the worker on its own thread
pub fn launch(plan: LaunchPlan, worker: Arc<dyn Worker>) -> Result<LaunchHandle> {
    worker.set_log_file(&plan.log_file);

    let config = plan.config.clone();
    let thread = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || worker.run(config))
        .map_err(DaemonHostError::WorkerThread)?;

    info!("Worker started, logging to {:?}", plan.log_file);
    Ok(LaunchHandle { plan, thread })
}

/// The host's own invocation, quoted when the path contains whitespace
pub fn host_invocation(exe_path: &Path) -> String {
    let path = exe_path.to_string_lossy();
    if path.chars().any(char::is_whitespace) {
        format!("\"{path}\"")
    } else {
        path.into_owned()
    }
}
