//! Daemonhost Windows Service executable
//!
//! This binary is designed to be run by the Windows Service Control Manager.
//! It resolves the worker daemon's log file and command line, then starts the
//! worker on a background thread.
//!
//! Start arguments of the form `logpath=<dir>` override the log directory:
//!   sc start daemonhost logpath="C:\Daemon Logs"
//!
//! To stop the service:
//!   net stop daemonhost
//!   or: sc stop daemonhost

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // This binary should only be started by the Windows Service Control Manager
    daemonhost::service::run_service().map_err(|e| {
        eprintln!("Failed to run service: {}", e);
        e
    })?;
    Ok(())
}
