//! Snapshot of the environment variables consulted at start

/// Default name of the log directory variable
pub const DEFAULT_LOGGING_VAR: &str = "DAEMONHOST_LOGGING";

/// Default name of the worker options variable
pub const DEFAULT_OPTIONS_VAR: &str = "DAEMONHOST_OPTIONS";

/// Read-only view of the two environment entries the start sequence uses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentView {
    /// Default log directory (overridden by a `logpath=` argument)
    pub log_path: Option<String>,
    /// Options appended verbatim to the worker's command line
    pub options: Option<String>,
}

impl EnvironmentView {
    pub fn new(log_path: Option<String>, options: Option<String>) -> Self {
        Self { log_path, options }
    }

    /// Take a snapshot of the process environment
    ///
    /// Variables that are unset or not valid Unicode read as absent.
    pub fn capture(logging_var: &str, options_var: &str) -> Self {
        Self {
            log_path: std::env::var(logging_var).ok(),
            options: std::env::var(options_var).ok(),
        }
    }
}
