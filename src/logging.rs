//! Tracing subscriber setup used by the process entry point.

use std::env;
use std::sync::OnceLock;

use tracing_appender::non_blocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{fmt, writer::MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// Keeps the non-blocking writer's background thread alive for the life of
/// the process; dropping it would silently stop flushing buffered logs.
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

pub fn init(log_dir: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .without_time()
        .with_target(false)
        .with_ansi(true)
        .with_level(true);

    if let Some(dir) = log_dir {
        let max_files = env::var("LOG_MAX_FILES").ok().and_then(|v| v.parse::<usize>().ok());

        let mut file_builder = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("herald-core.log");

        if let Some(n) = max_files {
            file_builder = file_builder.max_log_files(n);
        }

        let file_appender = file_builder.build(dir).expect("failed to create log file");
        let (file_writer, guard) = non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);

        let stdout = std::io::stdout.with_max_level(tracing::Level::INFO);
        let writer = stdout.and(file_writer);

        builder.with_writer(writer).init();
    } else {
        builder.init();
    }

    tracing::info!("logger initialized");
}
