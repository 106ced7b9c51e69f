//! Resolution of the worker's log destination and command line

pub mod environment;
pub mod fallback;
pub mod log_name;
pub mod orchestrator;
pub mod path;
pub mod scan;

pub use environment::{EnvironmentView, DEFAULT_LOGGING_VAR, DEFAULT_OPTIONS_VAR};
pub use fallback::{FallbackPolicy, LogDirs, SystemDirs, FALLBACK_LOG_DIR};
pub use log_name::log_file_name;
pub use orchestrator::{host_invocation, launch, LaunchHandle, LaunchPlan, StartupOrchestrator};
pub use path::{extract_log_path, LOG_PATH_MARKER};
pub use scan::{compose_config, scan_arguments, ArgumentScan};
