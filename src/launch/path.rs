//! Extraction of an explicit `logpath=` override from a start argument

/// Marker that flags an argument as a log directory override
pub const LOG_PATH_MARKER: &str = "logpath=";

/// Check whether a normalized argument carries the override marker
pub fn has_log_path_marker(arg: &str) -> bool {
    arg.contains(LOG_PATH_MARKER)
}

/// Extract the log directory following the `logpath=` marker.
///
/// A quoted value is returned with its quotes, from the first quote through
/// the matching closing quote (or the end of the token if it is never
/// closed). An unquoted value ends at the next space. Returns an empty
/// string when the marker is absent.
pub fn extract_log_path(arg: &str) -> String {
    let Some(start) = arg.find(LOG_PATH_MARKER) else {
        tracing::debug!("logpath=<path name> not found in '{}'", arg);
        return String::new();
    };

    // Drop the marker but keep whatever preceded it, so `start` now points
    // at the first character of the value.
    let remains = format!("{}{}", &arg[..start], &arg[start + LOG_PATH_MARKER.len()..]);
    let value = &remains[start..];

    if let Some(quote) = value.find('"') {
        let end = value[quote + 1..]
            .find('"')
            .map(|close| quote + 1 + close + 1)
            .unwrap_or(value.len());
        return value[quote..end].to_string();
    }

    match value.find(' ') {
        Some(stop) => value[..stop].to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_path_keeps_quotes() {
        assert_eq!(
            extract_log_path(r#"logpath="C:\a b\c""#),
            r#""C:\a b\c""#
        );
    }

    #[test]
    fn test_unquoted_path_stops_at_space() {
        assert_eq!(extract_log_path(r"logpath=C:\x more=stuff"), r"C:\x");
    }

    #[test]
    fn test_unquoted_path_runs_to_end() {
        assert_eq!(extract_log_path("logpath=/var/log/daemon"), "/var/log/daemon");
    }

    #[test]
    fn test_marker_with_prefix() {
        assert_eq!(extract_log_path("--logpath=/srv/logs"), "/srv/logs");
        assert_eq!(
            extract_log_path(r#"-logpath="/srv/my logs" --next"#),
            r#""/srv/my logs""#
        );
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(extract_log_path(r#"logpath="/srv/open"#), r#""/srv/open"#);
    }

    #[test]
    fn test_missing_marker_yields_empty() {
        assert_eq!(extract_log_path("--verbosity=5"), "");
        assert!(!has_log_path_marker("--verbosity=5"));
        assert!(has_log_path_marker("logpath=x"));
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(extract_log_path("logpath="), "");
    }
}
