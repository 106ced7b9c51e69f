//! daemonhost - worker daemon service host CLI

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

use daemonhost::config::{Args, Command};
use daemonhost::launch::SystemDirs;
use daemonhost::service::config::ServiceConfig;
use daemonhost::worker::Worker;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args)?;

    let config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::load_default()?,
    };

    // Execute command
    match args.command.unwrap_or_default() {
        Command::Run { args } => cmd_run(&config, &args),
        Command::Resolve { args } => cmd_resolve(&config, &args),
        Command::SampleConfig => {
            print!("{}", ServiceConfig::sample_config());
            Ok(())
        }
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let level = args.log_level();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if let Some(log_file) = &args.log {
        let file = std::fs::File::create(log_file)?;
        subscriber.with_writer(file).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Start the worker as the service would, then wait for it
fn cmd_run(config: &ServiceConfig, raw_args: &[String]) -> Result<()> {
    let exe_path = std::env::current_exe().context("cannot locate host executable")?;
    let (orchestrator, worker) = config.launcher(&exe_path);
    let worker: Arc<dyn Worker> = Arc::new(worker);

    let handle = match orchestrator.start(&SystemDirs, raw_args, &config.environment(), worker) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Cannot create log file, shutting down: {}", e);
            return Err(e.into());
        }
    };

    println!("Worker log: {}", handle.plan().log_file.display());
    println!("Worker running. It stops when the worker exits.");

    handle.join()?;
    println!("Worker exited.");
    Ok(())
}

/// Print what the service would hand to the worker
fn cmd_resolve(config: &ServiceConfig, raw_args: &[String]) -> Result<()> {
    let exe_path = std::env::current_exe().context("cannot locate host executable")?;
    let (orchestrator, worker) = config.launcher(&exe_path);
    let plan = orchestrator.resolve(&SystemDirs, raw_args, &config.environment())?;

    println!("Log directory: {}", plan.log_dir.display());
    println!("Log file:      {}", plan.log_file.display());
    println!("Worker:        {}", worker.program().display());
    println!("Identity:      {}", orchestrator.identity());
    println!("Command line:  {}", plan.config);
    Ok(())
}
