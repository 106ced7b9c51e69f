//! Windows Service runner implementation

use crate::launch::{LaunchHandle, SystemDirs};
use crate::service::config::ServiceConfig;
use crate::service::{EXIT_LOG_DIR_UNAVAILABLE, SERVICE_DISPLAY_NAME, SERVICE_NAME};
use crate::worker::Worker;
use crossbeam_channel::bounded;
use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use windows_service::{
    define_windows_service,
    service::{
        ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState, ServiceStatus,
        ServiceType,
    },
    service_control_handler::{self, ServiceControlHandlerResult, ServiceStatusHandle},
    service_dispatcher,
};

const SERVICE_TYPE: ServiceType = ServiceType::OWN_PROCESS;

/// Run the Windows service
///
/// This is the main entry point called from the service binary.
/// It registers with the Service Control Manager and starts the service dispatcher.
pub fn run_service() -> Result<(), windows_service::Error> {
    service_dispatcher::start(SERVICE_NAME, ffi_service_main)
}

// Generate the Windows service entry point
define_windows_service!(ffi_service_main, service_main);

/// Service main function called by the Windows Service Control Manager
fn service_main(arguments: Vec<OsString>) {
    if let Err(e) = run_service_main(arguments) {
        error!("Service error: {}", e);
    }
}

fn run_service_main(arguments: Vec<OsString>) -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServiceConfig::load_default().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}, using defaults", e);
        ServiceConfig::default()
    });

    // Initialize logging
    init_logging(&config);

    info!("Starting {} service", SERVICE_DISPLAY_NAME);

    let (stop_tx, stop_rx) = bounded::<()>(1);

    // Register service control handler
    let status_handle = service_control_handler::register(
        SERVICE_NAME,
        move |control_event| -> ServiceControlHandlerResult {
            match control_event {
                ServiceControl::Stop | ServiceControl::Shutdown => {
                    info!("Received stop/shutdown signal");
                    let _ = stop_tx.try_send(());
                    ServiceControlHandlerResult::NoError
                }
                ServiceControl::Interrogate => ServiceControlHandlerResult::NoError,
                _ => ServiceControlHandlerResult::NotImplemented,
            }
        },
    )?;

    // Report service starting
    set_status(
        &status_handle,
        ServiceState::StartPending,
        ServiceExitCode::Win32(0),
        Duration::from_secs(10),
    )?;

    // The SCM passes the service name first
    let args: Vec<String> = arguments
        .iter()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let env = config.environment();

    let exe_path = std::env::current_exe()?;
    let (orchestrator, worker) = config.launcher(&exe_path);
    let worker: Arc<dyn Worker> = Arc::new(worker);

    let handle: LaunchHandle = match orchestrator.start(&SystemDirs, &args, &env, worker) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Cannot create log file, shutting down: {}", e);

            // Report service stopped with error
            set_status(
                &status_handle,
                ServiceState::Stopped,
                ServiceExitCode::ServiceSpecific(EXIT_LOG_DIR_UNAVAILABLE),
                Duration::default(),
            )?;

            return Err(e.into());
        }
    };

    // Report service running
    status_handle.set_service_status(ServiceStatus {
        service_type: SERVICE_TYPE,
        current_state: ServiceState::Running,
        controls_accepted: ServiceControlAccept::STOP | ServiceControlAccept::SHUTDOWN,
        exit_code: ServiceExitCode::Win32(0),
        checkpoint: 0,
        wait_hint: Duration::default(),
        process_id: None,
    })?;

    // Wait for stop; the worker is not signalled and ends with the process
    let _ = stop_rx.recv();

    if handle.is_finished() {
        warn!("Worker had already exited before stop");
    }

    // Report service stopped
    set_status(
        &status_handle,
        ServiceState::Stopped,
        ServiceExitCode::Win32(0),
        Duration::default(),
    )?;

    info!("Service stopped");
    Ok(())
}

fn set_status(
    status_handle: &ServiceStatusHandle,
    state: ServiceState,
    exit_code: ServiceExitCode,
    wait_hint: Duration,
) -> windows_service::Result<()> {
    status_handle.set_service_status(ServiceStatus {
        service_type: SERVICE_TYPE,
        current_state: state,
        controls_accepted: ServiceControlAccept::empty(),
        exit_code,
        checkpoint: 0,
        wait_hint,
        process_id: None,
    })
}

/// Initialize logging for service mode
fn init_logging(config: &ServiceConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if !config.host_log_file.is_empty() {
        // Log to file
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.host_log_file);

        match file {
            Ok(file) => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_writer(file).with_ansi(false))
                    .init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: Failed to open log file: {}", e);
            }
        }
    }

    // Services don't have a console
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::sink))
        .init();
}
