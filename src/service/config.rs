//! Service configuration file support

use crate::launch::{
    host_invocation, EnvironmentView, StartupOrchestrator, DEFAULT_LOGGING_VAR,
    DEFAULT_OPTIONS_VAR, FALLBACK_LOG_DIR,
};
use crate::worker::{ProcessWorker, DEFAULT_WORKER_PROGRAM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the config looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "daemonhost.toml";

/// Service configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Worker executable (empty = daemon-worker next to the host)
    pub worker_program: String,

    /// Environment variable holding the default log directory
    pub logging_var: String,

    /// Environment variable holding extra worker options
    pub options_var: String,

    /// Last-resort log directory
    pub fallback_log_dir: String,

    /// Host log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Host log file path (empty = no file logging)
    pub host_log_file: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            worker_program: String::new(),
            logging_var: DEFAULT_LOGGING_VAR.to_string(),
            options_var: DEFAULT_OPTIONS_VAR.to_string(),
            fallback_log_dir: FALLBACK_LOG_DIR.to_string(),
            log_level: "info".to_string(),
            host_log_file: String::new(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().to_string_lossy().to_string(),
            source: e,
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. Same directory as executable: daemonhost.toml
    /// 2. %PROGRAMDATA%\daemonhost\config.toml
    /// 3. User config directory: daemonhost/config.toml
    pub fn load_default() -> Result<Self, ConfigError> {
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Return default config if no file found
        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                paths.push(exe_dir.join(CONFIG_FILE_NAME));
            }
        }

        if let Ok(program_data) = std::env::var("PROGRAMDATA") {
            paths.push(Path::new(&program_data).join("daemonhost").join("config.toml"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("daemonhost").join("config.toml"));
        }

        paths
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        // Create parent directories if needed
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_string_lossy().to_string(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io {
            path: path.as_ref().to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Snapshot the environment variables named by this config
    pub fn environment(&self) -> EnvironmentView {
        EnvironmentView::capture(&self.logging_var, &self.options_var)
    }

    /// Resolve the worker executable relative to the host executable
    pub fn worker_program_path(&self, exe_path: &Path) -> PathBuf {
        if self.worker_program.is_empty() {
            exe_path.with_file_name(DEFAULT_WORKER_PROGRAM)
        } else {
            PathBuf::from(&self.worker_program)
        }
    }

    /// Build the orchestrator and worker adapter for the executable at `exe_path`
    pub fn launcher(&self, exe_path: &Path) -> (StartupOrchestrator, ProcessWorker) {
        let orchestrator = StartupOrchestrator::new(host_invocation(exe_path), exe_path)
            .with_fallback_dir(&self.fallback_log_dir);
        let worker = ProcessWorker::new(self.worker_program_path(exe_path));
        (orchestrator, worker)
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        format!(
            r#"# Daemonhost Service Configuration
# This file configures how the service host starts the worker daemon

# Worker executable (empty = {worker} next to the host executable)
worker_program = ""

# Environment variable naming the default worker log directory.
# A "logpath=<dir>" start argument overrides it.
logging_var = "{logging}"

# Environment variable whose value is appended to the worker command line
options_var = "{options}"

# Last-resort log directory, used when the configured one cannot be created
fallback_log_dir = '{fallback}'

# Host log level: trace, debug, info, warn, error (default: info)
log_level = "info"

# Host log file path (empty = no file logging)
# This is the host's own diagnostics, not the worker's log.
host_log_file = ""
"#,
            worker = DEFAULT_WORKER_PROGRAM,
            logging = DEFAULT_LOGGING_VAR,
            options = DEFAULT_OPTIONS_VAR,
            fallback = FALLBACK_LOG_DIR,
        )
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading/writing config file
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Error parsing TOML
    Parse {
        path: String,
        source: toml::de::Error,
    },
    /// Error serializing config
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path, source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path, source)
            }
            ConfigError::Serialize(e) => write!(f, "Failed to serialize config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}
