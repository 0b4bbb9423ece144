//! File logging bootstrap.
//!
//! The library only talks to the `log` facade. A host that wants the output
//! on disk calls [`init_logging`] once with an absolute directory; calling it
//! again with the same settings is a no-op, switching settings is rejected.

use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

use crate::error::{ListError, ListResult};

const LOG_FILE_BASENAME: &str = "outliner";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Start rotating file logs at `level` under `log_dir`.
///
/// # Errors
///
/// Returns [`ListError::Logging`] for an unknown level, a relative or empty
/// directory, a directory that cannot be created, or a second call with
/// different settings.
pub fn init_logging(level: &str, log_dir: &str) -> ListResult<()> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir)?;

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, &log_dir))?;

    if state.log_dir != log_dir {
        return Err(ListError::Logging(format!(
            "already logging to `{}`, refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        )));
    }
    if state.level != level {
        return Err(ListError::Logging(format!(
            "already logging at `{}`, refusing to switch to `{level}`",
            state.level
        )));
    }
    Ok(())
}

/// Active `(level, directory)`, or `None` before [`init_logging`] succeeded
#[must_use]
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` in debug builds, `info` in release builds
#[must_use]
pub const fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "info" }
}

fn start_logger(level: &'static str, log_dir: &Path) -> ListResult<LoggingState> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        ListError::Logging(format!(
            "cannot create log directory `{}`: {err}",
            log_dir.display()
        ))
    })?;

    let logger = Logger::try_with_str(level)
        .map_err(|err| ListError::Logging(format!("invalid log level `{level}`: {err}")))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| ListError::Logging(format!("cannot start logger: {err}")))?;

    info!(
        "logging started: level={level} dir={} version={}",
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        _logger: logger,
    })
}

fn normalize_level(level: &str) -> ListResult<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ListError::Logging(format!(
            "unsupported log level `{other}`"
        ))),
    }
}

fn normalize_log_dir(log_dir: &str) -> ListResult<PathBuf> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(ListError::Logging("log directory is empty".to_string()));
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(ListError::Logging(format!(
            "log directory must be absolute, got `{trimmed}`"
        )));
    }
    Ok(path.to_path_buf())
}
