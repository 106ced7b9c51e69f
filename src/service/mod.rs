//! Windows Service support for daemonhost
//!
//! This module provides Windows Service functionality, allowing the worker
//! daemon to run as a background service managed by the Windows Service
//! Control Manager.

#[cfg(all(windows, feature = "service"))]
mod runner;

pub mod config;

#[cfg(all(windows, feature = "service"))]
pub use runner::run_service;

/// Service name used for registration
pub const SERVICE_NAME: &str = "daemonhost";

/// Service display name shown in services.msc
pub const SERVICE_DISPLAY_NAME: &str = "Daemonhost Worker Service";

/// Service description
pub const SERVICE_DESCRIPTION: &str =
    "Resolves the worker daemon's log destination and command line, then runs it in the background";

/// Service-specific exit code reported when no log directory could be created
pub const EXIT_LOG_DIR_UNAVAILABLE: u32 = 1;
