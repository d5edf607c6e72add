//! Service logging bootstrap.
//!
//! # Responsibility
//! - Start the rolling file logger once per process.
//! - Route panics into the log as single-line events.
//!
//! # Invariants
//! - Repeating initialization with the same settings is a no-op.
//! - Initialization with a different level or directory fails with `Conflict`.
//! - Initialization never panics.

use crate::config::LoggingConfig;
use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};
use std::sync::Once;
use thiserror::Error;

const LOG_BASENAME: &str = "mstemplate";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: Once = Once::new();

#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    level: LevelFilter,
    dir: PathBuf,
}

struct ActiveLogger {
    settings: Settings,
    _handle: LoggerHandle,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnsupportedLevel(String),
    #[error("log_dir must be a non-empty absolute path, got `{0}`")]
    InvalidDir(String),
    #[error("failed to create log directory `{}`: {source}", .dir.display())]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to start logger: {0}")]
    Backend(#[from] flexi_logger::FlexiLoggerError),
    #[error("logging already initialized with {field} `{active}`; refusing to switch to `{requested}`")]
    Conflict {
        field: &'static str,
        active: String,
        requested: String,
    },
}

/// Starts file logging at `level` under `log_dir`.
///
/// Warnings and errors are mirrored to stderr.
///
/// # Errors
/// - `UnsupportedLevel` or `InvalidDir` for malformed input.
/// - `CreateDir` or `Backend` when the logger cannot start.
/// - `Conflict` when logging already runs with other settings.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let requested = Settings {
        level: parse_level(level)?,
        dir: parse_dir(log_dir.as_ref())?,
    };

    let active = ACTIVE.get_or_try_init(|| start(&requested))?;
    check_same(&active.settings, &requested)
}

pub fn init_logging_from_config(config: &LoggingConfig) -> Result<(), LoggingError> {
    init_logging(&config.level, &config.dir)
}

/// Returns `(level, log_dir)` when logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (level_name(active.settings.level), active.settings.dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(settings: &Settings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|source| LoggingError::CreateDir {
        dir: settings.dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(level_name(settings.level))?
        .log_to_file(
            FileSpec::default()
                .directory(&settings.dir)
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    PANIC_HOOK.call_once(install_panic_hook);

    info!(
        "event=service_start module=core status=ok version={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        level_name(settings.level),
        settings.dir.display()
    );

    Ok(ActiveLogger {
        settings: settings.clone(),
        _handle: handle,
    })
}

fn check_same(active: &Settings, requested: &Settings) -> Result<(), LoggingError> {
    if active.dir != requested.dir {
        return Err(LoggingError::Conflict {
            field: "directory",
            active: active.dir.display().to_string(),
            requested: requested.dir.display().to_string(),
        });
    }
    if active.level != requested.level {
        return Err(LoggingError::Conflict {
            field: "level",
            active: level_name(active.level).to_string(),
            requested: level_name(requested.level).to_string(),
        });
    }
    Ok(())
}

fn parse_level(raw: &str) -> Result<LevelFilter, LoggingError> {
    let normalized = raw.trim().to_ascii_lowercase();
    let candidate = if normalized == "warning" {
        "warn"
    } else {
        normalized.as_str()
    };
    match candidate.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(LoggingError::UnsupportedLevel(normalized)),
        Ok(level) => Ok(level),
    }
}

fn level_name(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

fn parse_dir(raw: &Path) -> Result<PathBuf, LoggingError> {
    let text = raw.to_string_lossy();
    let dir = PathBuf::from(text.trim());
    if dir.as_os_str().is_empty() || !dir.is_absolute() {
        return Err(LoggingError::InvalidDir(text.trim().to_string()));
    }
    Ok(dir)
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            one_line(&panic_message(info), PANIC_PAYLOAD_LIMIT)
        );
        previous(info);
    }));
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Flattens line breaks and caps the length at `limit` chars.
fn one_line(value: &str, limit: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    match flat.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, one_line, parse_dir, parse_level, LoggingError};
    use log::LevelFilter;
    use std::path::Path;

    #[test]
    fn level_parsing_accepts_aliases_and_rejects_off() {
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level(" warning ").unwrap(), LevelFilter::Warn);
        assert!(matches!(
            parse_level("verbose"),
            Err(LoggingError::UnsupportedLevel(level)) if level == "verbose"
        ));
        assert!(parse_level("off").is_err());
    }

    #[test]
    fn dir_parsing_rejects_relative_and_empty_paths() {
        assert!(parse_dir(Path::new("logs/dev")).is_err());
        assert!(parse_dir(Path::new("  ")).is_err());
    }

    #[test]
    fn one_line_flattens_and_truncates() {
        let flat = one_line("line1\nline2\rline3", 8);
        assert_eq!(flat, "line1 li...");
        assert_eq!(one_line("short", 8), "short");
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let log_dir = tempfile::tempdir().unwrap();
        let other_dir = tempfile::tempdir().unwrap();

        init_logging("info", log_dir.path()).unwrap();
        init_logging("INFO", log_dir.path()).unwrap();

        let level_error = init_logging("debug", log_dir.path()).unwrap_err();
        assert!(matches!(
            level_error,
            LoggingError::Conflict { field: "level", .. }
        ));

        let dir_error = init_logging("info", other_dir.path()).unwrap_err();
        assert!(dir_error.to_string().contains("refusing to switch"));

        let (active_level, active_dir) = logging_status().unwrap();
        assert_eq!(active_level, "info");
        assert_eq!(active_dir, log_dir.path());
    }
}
