//! daemonhost - worker daemon service host
//!
//! Resolves where the worker daemon logs and what command line it gets from
//! the start arguments and environment, then runs it on a background thread
//! so the service start callback returns promptly.

pub mod config;
pub mod error;
pub mod launch;
pub mod service;
pub mod worker;

pub use error::{DaemonHostError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
