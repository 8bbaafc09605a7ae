//! Command-level logging facade.
use std::path::{Path, PathBuf};

use super::subscriber::STAGE_TARGET;
use super::utils::log_file_path;

/// Structured logger used by command handlers.
///
/// All messages are routed through [`tracing`]; the subscriber installed by
/// [`init_subscriber`](super::init_subscriber) writes them to the console
/// and to a persistent log file at `$XDG_CACHE_HOME/devtools/<command>.log`
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`.
    ///
    /// Stores the log file path for display; the file itself is created by
    /// the subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` as its log location.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self { log_file }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Log an error message.
    ///
    /// Part of the facade for library callers; the bundled commands report
    /// failures through their returned error instead.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::super::isolated_logger;
    use std::fs;

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(
            contents.contains("[debug]") && contents.contains(&marker),
            "debug message should appear in log file"
        );
    }

    #[test]
    fn info_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("info-marker-{}", std::process::id());
        log.info(&marker);
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(
            contents.contains(&marker),
            "info message should appear in log file"
        );
    }

    #[test]
    fn warn_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("careful");
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(
            contents.contains("[warn] careful"),
            "warn tag should appear in log file"
        );
    }

    #[test]
    fn error_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.error("broken");
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(
            contents.contains("[error] broken"),
            "error tag should appear in log file"
        );
    }

    #[test]
    fn stage_written_to_file_with_arrow() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Creating backup");
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(
            contents.contains("==> Creating backup"),
            "stage arrow should appear in log file"
        );
    }

    #[test]
    fn library_events_reach_the_log_file() {
        let (log, tmp, _guard) = isolated_logger();
        let missing = tmp.path().join("absent.cfg");
        crate::config::ini::read_config(&missing).unwrap();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("absent.cfg"));
    }
}
