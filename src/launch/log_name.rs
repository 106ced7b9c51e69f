//! Timestamped, sortable worker log file names

use chrono::NaiveDateTime;

/// Prefix of every worker log file name
pub const LOG_NAME_PREFIX: &str = "DaemonLog_";

/// Extension appended after the timestamp
pub const LOG_NAME_EXTENSION: &str = "txt";

/// Build the log file name for the given wall-clock time.
///
/// The universal sortable form `2024-01-15 10:30:45Z` becomes
/// `DaemonLog_2024-01-15_10_30_45.txt`: the space and colons turn into
/// underscores and the trailing zone marker turns into the period in front
/// of the extension. Names only have second resolution.
pub fn log_file_name(timestamp: NaiveDateTime) -> String {
    let sortable = timestamp.format("%Y-%m-%d %H:%M:%SZ").to_string();
    let stamp = sortable
        .replace(' ', "_")
        .replace(':', "_")
        .to_lowercase()
        .replace('z', ".");
    format!("{LOG_NAME_PREFIX}{stamp}{LOG_NAME_EXTENSION}")
}
