//! File-logging bootstrap. Off unless `TASKPAD_LOG_DIR` is set, so the CLI
//! stays quiet by default and log output never mixes with command output.

use crate::error::AppError;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_DIR_ENV_VAR: &str = "TASKPAD_LOG_DIR";
const LOG_LEVEL_ENV_VAR: &str = "TASKPAD_LOG_LEVEL";
const LOG_FILE_BASENAME: &str = "taskpad";

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Starts file logging under `log_dir`, once per process. Later calls are
/// no-ops; an invalid level is rejected even then.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), AppError> {
    let level = normalize_level(level)?;
    if LOGGER.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(log_dir).map_err(|err| AppError::io(err.to_string()))?;
    let handle = Logger::try_with_str(level)
        .map_err(|err| AppError::invalid_input(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .append()
        .start()
        .map_err(|err| AppError::io(err.to_string()))?;

    let _ = LOGGER.set(handle);
    Ok(())
}

/// Reads `TASKPAD_LOG_DIR`/`TASKPAD_LOG_LEVEL` and starts logging when a
/// directory is configured. Returns the directory in use, or `None` when
/// logging stays off.
pub fn init_from_env() -> Result<Option<PathBuf>, AppError> {
    let dir = match std::env::var(LOG_DIR_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => return Ok(None),
    };

    let level = std::env::var(LOG_LEVEL_ENV_VAR).unwrap_or_else(|_| default_level().to_string());
    init_logging(&level, &dir)?;
    Ok(Some(dir))
}

pub fn default_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "warn" }
}

fn normalize_level(level: &str) -> Result<&'static str, AppError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(AppError::invalid_input(format!(
            "unsupported log level {other:?}; expected trace|debug|info|warn|error"
        ))),
    }
}
