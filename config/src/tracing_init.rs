//! Tracing subscriber setup shared by binaries (feature `tracing-init`).
//!
//! Filter comes from `RUST_LOG` when set, otherwise the caller's default. Output goes to
//! stderr or to a log file through a non-blocking appender.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appends to this file; parent directories are created.
    File(PathBuf),
}

/// Keeps the file writer flushing; drop it at the end of `main`.
pub struct TracingGuard {
    _worker: Option<WorkerGuard>,
}

/// Installs a global fmt subscriber. A second call is a no-op (the first subscriber stays).
pub fn init_tracing(default_filter: &str, target: LogTarget) -> std::io::Result<TracingGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_filter(filter),
                )
                .try_init();
            Ok(TracingGuard { _worker: None })
        }
        LogTarget::File(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&dir)?;
            let file_name = path.file_name().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "log path has no file name")
            })?;
            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, worker) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer)
                        .with_filter(filter),
                )
                .try_init();
            Ok(TracingGuard {
                _worker: Some(worker),
            })
        }
    }
}
