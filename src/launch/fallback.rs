//! Log directory fallback policy
//!
//! The candidate from the argument scan (or a default derived from the host
//! executable's location) is tried first. If it cannot be created, a fixed
//! last-resort directory is used. Only failure of that last tier is fatal.

use crate::error::{DaemonHostError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Folder that replaces the executable's file name in the derived default
pub const DEFAULT_LOGS_FOLDER: &str = "logs";

/// Last-resort log directory
#[cfg(windows)]
pub const FALLBACK_LOG_DIR: &str = r"\TEMP\daemonhost\logs";

/// Last-resort log directory
#[cfg(not(windows))]
pub const FALLBACK_LOG_DIR: &str = "/tmp/daemonhost/logs";

/// Filesystem operations needed by the fallback policy
pub trait LogDirs {
    /// Whether `path` is an existing directory
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents
    fn create(&self, path: &Path) -> std::io::Result<()>;
}

/// [`LogDirs`] backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDirs;

impl LogDirs for SystemDirs {
    fn exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create(&self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Derive the default log directory from the host's invocation string by
/// substituting the logs folder for the executable's file name.
///
/// Quotes around the invocation survive the substitution and are removed by
/// the quote cleanup tier.
pub fn derive_default_dir(invocation: &str, exe_path: &Path) -> String {
    if let Some(file_name) = exe_path.file_name().and_then(|n| n.to_str()) {
        if let Some(pos) = invocation.rfind(file_name) {
            let mut derived = String::with_capacity(invocation.len());
            derived.push_str(&invocation[..pos]);
            derived.push_str(DEFAULT_LOGS_FOLDER);
            derived.push_str(&invocation[pos + file_name.len()..]);
            return derived;
        }
    }

    exe_path
        .with_file_name(DEFAULT_LOGS_FOLDER)
        .to_string_lossy()
        .into_owned()
}

/// Strip the surrounding quotes left by a quoted `logpath=` value.
///
/// Triggered by a trailing quote only; the first character is then removed
/// unconditionally.
pub fn strip_quotes(candidate: &str) -> String {
    match candidate.strip_suffix('"') {
        Some(rest) => {
            let mut chars = rest.chars();
            chars.next();
            chars.as_str().to_string()
        }
        None => candidate.to_string(),
    }
}

/// Ordered log directory resolution
#[derive(Debug, Clone)]
pub struct FallbackPolicy {
    fallback_dir: PathBuf,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::new(FALLBACK_LOG_DIR)
    }
}

impl FallbackPolicy {
    /// Create a policy whose last resort is `fallback_dir`
    pub fn new(fallback_dir: impl Into<PathBuf>) -> Self {
        Self {
            fallback_dir: fallback_dir.into(),
        }
    }

    /// Resolve an existing log directory.
    ///
    /// `candidate` is the scan result; when absent, `derived_default` is
    /// used instead. Returns [`DaemonHostError::LogDirUnavailable`] only if
    /// the last-resort directory cannot be created either.
    pub fn resolve(
        &self,
        dirs: &dyn LogDirs,
        candidate: Option<String>,
        derived_default: &str,
    ) -> Result<PathBuf> {
        let candidate = candidate.unwrap_or_else(|| {
            debug!("No log path configured, deriving '{}'", derived_default);
            derived_default.to_string()
        });

        let candidate = strip_quotes(&candidate);

        if let Some(dir) = try_dir(dirs, &candidate) {
            return Ok(dir);
        }

        let fallback = self.fallback_dir.as_path();
        info!("Falling back to log directory {:?}", fallback);
        if !dirs.exists(fallback) {
            dirs.create(fallback).map_err(|e| {
                warn!("Cannot create log directory {:?}, shutting down: {}", fallback, e);
                DaemonHostError::log_dir_unavailable(fallback, e)
            })?;
        }

        Ok(self.fallback_dir.clone())
    }
}

/// Ensure `candidate` exists, returning `None` if it has to be abandoned
fn try_dir(dirs: &dyn LogDirs, candidate: &str) -> Option<PathBuf> {
    if candidate.is_empty() {
        warn!("Empty log path");
        return None;
    }

    let path = PathBuf::from(candidate);
    if dirs.exists(&path) {
        return Some(path);
    }

    match dirs.create(&path) {
        Ok(()) => {
            debug!("Created log directory {:?}", path);
            Some(path)
        }
        Err(e) => {
            warn!("Access denied {:?}: {}", path, e);
            None
        }
    }
}
