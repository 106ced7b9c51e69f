//! Merging of start arguments and environment into the worker's inputs

use crate::launch::path::{extract_log_path, has_log_path_marker};
use tracing::debug;

/// Outcome of scanning the start arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentScan {
    /// Normalized arguments that were not consumed as an override
    pub residual: Vec<String>,
    /// Effective log directory candidate; `None` when neither the
    /// environment nor an argument named one
    pub log_path: Option<String>,
}

/// Scan the start arguments against the environment's default log path.
///
/// Each argument is lower-cased and trimmed. One carrying the `logpath=`
/// marker replaces the log path candidate and is dropped; every other
/// non-empty argument is kept as residual. When several markers appear the
/// last one wins.
pub fn scan_arguments<S: AsRef<str>>(args: &[S], env_log_path: Option<&str>) -> ArgumentScan {
    let mut scan = ArgumentScan {
        residual: Vec::new(),
        log_path: env_log_path.map(str::to_string),
    };

    for arg in args {
        let normalized = arg.as_ref().to_lowercase();
        let normalized = normalized.trim();

        if has_log_path_marker(normalized) {
            let path = extract_log_path(normalized);
            debug!("Log path override from arguments: '{}'", path);
            scan.log_path = Some(path);
        } else if !normalized.is_empty() {
            scan.residual.push(normalized.to_string());
        }
    }

    scan
}

/// Compose the single command line handed to the worker's run loop.
///
/// The identity token stands in for the worker's argv[0]; residual
/// arguments and the options value follow, space separated. An unset or
/// empty options value adds nothing, not even the separating space, so the
/// line never ends in a dangling space.
pub fn compose_config(identity: &str, residual: &[String], options: Option<&str>) -> String {
    let mut config = identity.to_string();
    for arg in residual {
        config.push(' ');
        config.push_str(arg);
    }
    if let Some(options) = options.filter(|o| !o.is_empty()) {
        config.push(' ');
        config.push_str(options);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_overrides_environment() {
        let scan = scan_arguments(&["LogPath=/from/arg"], Some("/from/env"));
        assert_eq!(scan.log_path.as_deref(), Some("/from/arg"));
    }

    #[test]
    fn test_environment_used_without_override() {
        let scan = scan_arguments(&["--no-bt"], Some("/from/env"));
        assert_eq!(scan.log_path.as_deref(), Some("/from/env"));
        assert_eq!(scan.residual, vec!["--no-bt".to_string()]);
    }

    #[test]
    fn test_absent_is_distinct_from_empty() {
        let none: [&str; 0] = [];
        assert_eq!(scan_arguments(&none, None).log_path, None);
        assert_eq!(
            scan_arguments(&["logpath="], None).log_path.as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_marker_argument_excluded_from_residual() {
        let scan = scan_arguments(
            &["  --Verbosity=5 ", "logpath=/x", "--NO-BT", "   "],
            None,
        );
        assert_eq!(scan.residual, vec!["--verbosity=5", "--no-bt"]);
        assert!(scan.residual.iter().all(|a| !a.contains("logpath=")));
    }

    #[test]
    fn test_compose_with_options_only() {
        assert_eq!(compose_config("svc.exe", &[], Some("-v")), "svc.exe -v");
    }

    #[test]
    fn test_compose_with_residual_and_options() {
        let residual = vec!["--no-bt".to_string()];
        assert_eq!(
            compose_config("svc.exe", &residual, Some("--verbosity=15")),
            "svc.exe --no-bt --verbosity=15"
        );
    }

    #[test]
    fn test_compose_without_options() {
        assert_eq!(compose_config("svc.exe", &[], None), "svc.exe");
        assert_eq!(compose_config("svc.exe", &[], Some("")), "svc.exe");
    }
}
