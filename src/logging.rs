//! Logger bootstrap for the command-line tool.
//!
//! # Invariants
//! - Initialization happens at most once per process and never panics.
//! - Re-initialization with the same level is a no-op; a different level is
//!   rejected.
//! - `RUST_LOG`, when set, takes precedence over the requested level.

use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

use crate::error::{CleanError, Result};

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Start logging to stderr at `level` (trace|debug|info|warn|error).
pub fn init_logging(level: &str) -> Result<()> {
    let normalized_level = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        let logger = Logger::try_with_env_or_str(normalized_level)
            .map_err(|err| {
                CleanError::Configuration(format!("invalid log level `{normalized_level}`: {err}"))
            })?
            .log_to_stderr()
            .format(flexi_logger::default_format)
            .start()
            .map_err(|err| CleanError::Configuration(format!("failed to start logger: {err}")))?;

        log::debug!(
            "event=logging_init level={} version={}",
            normalized_level,
            env!("CARGO_PKG_VERSION")
        );
        Ok(LoggingState {
            level: normalized_level,
            _logger: logger,
        })
    })?;

    if state.level != normalized_level {
        return Err(CleanError::Configuration(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, normalized_level
        )));
    }
    Ok(())
}

/// Active level, or `None` before [`init_logging`].
pub fn logging_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(CleanError::Configuration(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        ))),
    }
}
