//! Logging infrastructure for EcoTiles.
//!
//! Provides structured logging with file and console output:
//! - Writes to `<log_dir>/<log_file>` (cleared on session start)
//! - Copies WARN and above to `<log_dir>/<stem>_warning.log`
//! - Also prints to stdout
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writers.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
    _warning_guard: WorkerGuard,
}

/// Paths of the two log files written for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFiles {
    pub main: PathBuf,
    pub warnings: PathBuf,
}

/// Name of the warning log for a main log file (`ecotiles.log` → `ecotiles_warning.log`).
pub fn warning_log_name(log_file: &str) -> String {
    let path = Path::new(log_file);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(log_file);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_warning.{}", stem, ext),
        None => format!("{}_warning", stem),
    }
}

/// Create the log directory and truncate both log files.
pub fn prepare_log_files(log_dir: &Path, log_file: &str) -> io::Result<LogFiles> {
    fs::create_dir_all(log_dir)?;

    let files = LogFiles {
        main: log_dir.join(log_file),
        warnings: log_dir.join(warning_log_name(log_file)),
    };
    fs::write(&files.main, "")?;
    fs::write(&files.warnings, "")?;
    Ok(files)
}

/// Initialize logging system.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or a log file cannot be cleared.
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    let files = prepare_log_files(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let warning_name = warning_log_name(log_file);
    let warning_appender = tracing_appender::rolling::never(log_dir, &warning_name);
    let (non_blocking_warning, warning_guard) = tracing_appender::non_blocking(warning_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .pretty();

    let warning_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_warning)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_span_events(FmtSpan::CLOSE)
        .pretty();

    // Defaults to INFO if RUST_LOG not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(warning_layer)
        .with(stdout_layer)
        .init();

    tracing::debug!(main = %files.main.display(), warnings = %files.warnings.display(), "Logging initialized");

    Ok(LoggingGuard {
        _file_guard: file_guard,
        _warning_guard: warning_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_log_name() {
        assert_eq!(warning_log_name("ecotiles.log"), "ecotiles_warning.log");
        assert_eq!(warning_log_name("server"), "server_warning");
    }

    #[test]
    fn test_creates_nested_directory_and_files() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("deep").join("logs");

        let files = prepare_log_files(&dir, "ecotiles.log").unwrap();

        assert!(dir.exists());
        assert_eq!(files.main, dir.join("ecotiles.log"));
        assert_eq!(files.warnings, dir.join("ecotiles_warning.log"));
        assert_eq!(fs::read_to_string(&files.main).unwrap(), "");
        assert_eq!(fs::read_to_string(&files.warnings).unwrap(), "");
    }

    #[test]
    fn test_clears_existing_files() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join("ecotiles.log"), "old log data").unwrap();
        fs::write(temp.path().join("ecotiles_warning.log"), "old warning").unwrap();

        let files = prepare_log_files(temp.path(), "ecotiles.log").unwrap();

        assert_eq!(fs::read_to_string(&files.main).unwrap(), "");
        assert_eq!(fs::read_to_string(&files.warnings).unwrap(), "");
    }

    #[test]
    fn test_file_in_place_of_directory_errors() {
        let temp = tempfile::TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        assert!(prepare_log_files(&blocker, "ecotiles.log").is_err());
    }
}
