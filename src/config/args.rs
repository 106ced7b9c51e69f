//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// daemonhost - worker daemon service host
///
/// Resolves the worker's log file and command line the same way the
/// service does, from the console
#[derive(Parser, Debug)]
#[command(name = "daemonhost")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbose output (can be repeated for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log output to file
    #[arg(long, global = true)]
    pub log: Option<String>,

    /// Configuration file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the worker in the foreground and wait for it to exit
    ///
    /// Put start arguments after `--` when they look like host flags,
    /// e.g. `daemonhost run -- -v logpath=C:\Logs`
    Run {
        /// Start arguments, e.g. logpath="C:\Daemon Logs"
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the resolved log file and worker command line
    Resolve {
        /// Start arguments, e.g. logpath="C:\Daemon Logs"
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print a sample configuration file
    SampleConfig,
}

impl Args {
    /// Get the log level based on verbose/quiet flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else {
            match self.verbose {
                0 => tracing::Level::INFO,
                1 => tracing::Level::DEBUG,
                _ => tracing::Level::TRACE,
            }
        }
    }
}

impl Default for Command {
    fn default() -> Self {
        Command::Run { args: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_collects_raw_arguments() {
        let args = Args::parse_from(["daemonhost", "run", "logpath=/srv/logs", "--no-bt"]);
        assert_eq!(
            args.command,
            Some(Command::Run {
                args: vec!["logpath=/srv/logs".to_string(), "--no-bt".to_string()]
            })
        );
    }

    #[test]
    fn test_host_flags_before_double_dash() {
        let args = Args::parse_from(["daemonhost", "run", "-v"]);
        assert_eq!(args.verbose, 1);
        assert_eq!(args.command, Some(Command::Run { args: Vec::new() }));

        let args = Args::parse_from(["daemonhost", "run", "--", "-v", "logpath=/srv/logs"]);
        assert_eq!(args.verbose, 0);
        assert_eq!(
            args.command,
            Some(Command::Run {
                args: vec!["-v".to_string(), "logpath=/srv/logs".to_string()]
            })
        );
    }

    #[test]
    fn test_log_level_flags() {
        let args = Args::parse_from(["daemonhost", "-vv", "resolve"]);
        assert_eq!(args.log_level(), tracing::Level::TRACE);
        let args = Args::parse_from(["daemonhost", "-q"]);
        assert_eq!(args.log_level(), tracing::Level::ERROR);
        assert_eq!(args.command.unwrap_or_default(), Command::default());
    }
}
