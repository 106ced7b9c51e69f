use chrono::NaiveDate;
use crossbeam_channel::{unbounded, Receiver, Sender};
use daemonhost::launch::{EnvironmentView, LogDirs, StartupOrchestrator, SystemDirs};
use daemonhost::worker::Worker;
use daemonhost::DaemonHostError;
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Real filesystem, except that creating paths under `denied` fails
struct DenyingDirs {
    denied: Vec<PathBuf>,
}

impl LogDirs for DenyingDirs {
    fn exists(&self, path: &Path) -> bool {
        SystemDirs.exists(path)
    }

    fn create(&self, path: &Path) -> io::Result<()> {
        if self.denied.iter().any(|d| path.starts_with(d)) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));
        }
        SystemDirs.create(path)
    }
}

struct FakeWorker {
    log_files: Mutex<Vec<PathBuf>>,
    run_tx: Sender<String>,
}

fn fake_worker() -> (Arc<FakeWorker>, Receiver<String>) {
    let (run_tx, run_rx) = unbounded();
    let worker = Arc::new(FakeWorker {
        log_files: Mutex::new(Vec::new()),
        run_tx,
    });
    (worker, run_rx)
}

impl Worker for FakeWorker {
    fn set_log_file(&self, path: &Path) {
        self.log_files.lock().push(path.to_path_buf());
    }

    fn run(&self, config: String) {
        let _ = self.run_tx.send(config);
    }
}

/// In-memory directories that all already exist
struct ExistingDirs(Vec<PathBuf>);

impl LogDirs for ExistingDirs {
    fn exists(&self, path: &Path) -> bool {
        self.0.iter().any(|d| d == path)
    }

    fn create(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "read-only"))
    }
}

#[test]
fn test_explicit_log_path_with_options() {
    // Arguments are lower-cased before extraction
    let dirs = ExistingDirs(vec![PathBuf::from(r"c:\logs")]);
    let orchestrator =
        StartupOrchestrator::new("host-invocation", "/opt/host/host").with_fallback_dir("/nowhere");
    let env = EnvironmentView::new(Some("/ignored".to_string()), Some("-v".to_string()));
    let (worker, run_rx) = fake_worker();

    let handle = orchestrator
        .start(&dirs, &[r"logpath=C:\logs"], &env, worker.clone())
        .unwrap();

    assert_eq!(handle.plan().log_dir, PathBuf::from(r"c:\logs"));
    assert_eq!(
        run_rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        "host-invocation -v"
    );

    let log_files = worker.log_files.lock().clone();
    assert_eq!(log_files, vec![handle.plan().log_file.clone()]);
    let name = log_files[0].file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("DaemonLog_"));
    assert!(name.ends_with(".txt"));

    handle.join().unwrap();
}

#[test]
fn test_log_file_named_after_timestamp() {
    let tmp = tempfile::tempdir().unwrap();
    let logs = tmp.path().join("env logs");
    let orchestrator = StartupOrchestrator::new("host", tmp.path().join("host"))
        .with_fallback_dir(tmp.path().join("fallback"));
    let env = EnvironmentView::new(Some(logs.to_string_lossy().into_owned()), None);
    let at = NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(10, 30, 45))
        .unwrap();
    let none: [&str; 0] = [];

    let plan = orchestrator.resolve_at(&SystemDirs, &none, &env, at).unwrap();

    assert!(logs.is_dir());
    assert_eq!(plan.log_file, logs.join("DaemonLog_2024-01-15_10_30_45.txt"));
    assert_eq!(plan.config, "host");
}

#[test]
fn test_denied_default_falls_back_and_launches() {
    let tmp = tempfile::tempdir().unwrap();
    let exe = tmp.path().join("bin").join("host");
    let fallback = tmp.path().join("temp").join("logs");
    let dirs = DenyingDirs {
        denied: vec![tmp.path().join("bin")],
    };
    let orchestrator = StartupOrchestrator::new(exe.to_string_lossy(), &exe)
        .with_fallback_dir(&fallback);
    let (worker, run_rx) = fake_worker();
    let none: [&str; 0] = [];

    let handle = orchestrator
        .start(&dirs, &none, &EnvironmentView::default(), worker)
        .unwrap();

    assert_eq!(handle.plan().log_dir, fallback);
    assert!(fallback.is_dir());
    assert!(run_rx.recv_timeout(Duration::from_secs(5)).is_ok());
    handle.join().unwrap();
}

#[test]
fn test_all_tiers_denied_never_launches() {
    let tmp = tempfile::tempdir().unwrap();
    let exe = tmp.path().join("bin").join("host");
    let dirs = DenyingDirs {
        denied: vec![tmp.path().to_path_buf()],
    };
    let orchestrator = StartupOrchestrator::new(exe.to_string_lossy(), &exe)
        .with_fallback_dir(tmp.path().join("temp"));
    let (worker, run_rx) = fake_worker();
    let none: [&str; 0] = [];

    let err = orchestrator
        .start(&dirs, &none, &EnvironmentView::default(), worker.clone())
        .unwrap_err();

    assert!(matches!(err, DaemonHostError::LogDirUnavailable { .. }));
    assert!(worker.log_files.lock().is_empty());
    assert!(run_rx.recv_timeout(Duration::from_millis(100)).is_err());
}
