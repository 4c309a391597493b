//! Log output for the client.
//!
//! [`client_sink`] builds a stdout + file logger that is *not* installed
//! globally; hand it to [`crate::ClientOptions::with_log_sink`] so each
//! client traces to its own destination. [`initialize`] installs a
//! process-wide logger once for applications that want one.

use crate::error::LoggerError;

use common::ErrorLocation;

use std::io::stdout;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, Log, info, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

const LOG_FILE_NAME: &str = "fortisoar.log";
const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Build a logger writing to stdout (colored) and, when given, `log_file`.
///
/// # Errors
/// [`LoggerError::LogFile`] when the log file cannot be opened.
pub fn client_sink(
    log_file: Option<&Path>,
    level: LevelFilter,
) -> Result<Arc<dyn Log>, LoggerError> {
    let (_, logger) = build_dispatch(log_file, level)?.into_log();
    Ok(Arc::from(logger))
}

/// Install the global logger, writing to stdout and `{log_dir}/fortisoar.log`.
///
/// Safe to call repeatedly; only the first call does anything.
///
/// # Errors
/// [`LoggerError::LogFile`] when the log file cannot be created,
/// [`LoggerError::Init`] when another global logger is already set.
pub fn initialize(log_dir: &Path, level: LevelFilter) -> Result<(), LoggerError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = build_dispatch(Some(&log_dir.join(LOG_FILE_NAME)), level).and_then(|dispatch| {
            dispatch.apply().map_err(|e| LoggerError::Init {
                message: format!("Failed to initialize logger: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
        });
        if result.is_ok() {
            info!("Logger initialized with level: {level:?}");
        }
    });

    result
}

#[track_caller]
fn build_dispatch(log_file: Option<&Path>, level: LevelFilter) -> Result<Dispatch, LoggerError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let stdout_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{target}]",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                target = record.target(),
            ))
        })
        .chain(stdout());

    let mut dispatch = Dispatch::new().level(level).chain(stdout_dispatch);

    if let Some(path) = log_file {
        let file = fern::log_file(path).map_err(|e| LoggerError::LogFile {
            message: format!("Failed to open log file {}: {e}", path.display()),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let file_dispatch = Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{target}]",
                    date = format_rfc3339(SystemTime::now()),
                    level = record.level(),
                    target = record.target(),
                ))
            })
            .chain(file);
        dispatch = dispatch.chain(file_dispatch);
    }

    Ok(dispatch)
}
