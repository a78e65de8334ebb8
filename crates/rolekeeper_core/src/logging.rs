//! Session logging bootstrap.
//!
//! # Responsibility
//! - Open one append-only log file per process run, named by start epoch.
//! - Echo every line to stdout.
//! - Emit `event=<name> key=value` diagnostic lines from core.
//!
//! # Invariants
//! - Logging init is idempotent for the same directory and level.
//! - Re-initialization with a different directory or level is rejected.
//! - Logging initialization must not panic.
//! - Lines are written through immediately; no rotation, no cleanup.

use flexi_logger::{DeferredNow, Duplicate, FileSpec, Logger, LoggerHandle, WriteMode};
use log::{error, info, Level, Record};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_SUFFIX: &str = "log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    session_file: PathBuf,
    _logger: LoggerHandle,
}

/// Starts session logging under `log_dir` and returns the session file path.
///
/// The directory is created when absent. Relative directories resolve
/// against the current working directory.
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when `log_dir` is empty or cannot be created.
/// - Returns an error when logging is already active with another config.
/// - Returns an error when logger backend setup fails.
pub fn init_session_logging(level: &str, log_dir: &Path) -> Result<PathBuf, String> {
    let normalized_level = normalize_level(level)?;
    let normalized_dir = normalize_log_dir(log_dir)?;

    if let Some(state) = LOGGING_STATE.get() {
        return check_active(state, normalized_level, &normalized_dir);
    }

    let init_dir = normalized_dir.clone();
    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        std::fs::create_dir_all(&init_dir).map_err(|err| {
            format!(
                "failed to create log directory `{}`: {err}",
                init_dir.display()
            )
        })?;

        let basename = session_basename(chrono::Utc::now().timestamp());
        let session_file = init_dir.join(session_file_name(&basename));

        let logger = Logger::try_with_str(normalized_level)
            .map_err(|err| format!("invalid log level `{normalized_level}`: {err}"))?
            .log_to_file(
                FileSpec::default()
                    .directory(init_dir.as_path())
                    .basename(basename)
                    .suppress_timestamp()
                    .suffix(LOG_FILE_SUFFIX),
            )
            .append()
            .write_mode(WriteMode::Direct)
            .duplicate_to_stdout(Duplicate::All)
            .format_for_files(session_format)
            .format_for_stdout(session_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;

        install_panic_hook_once();

        info!(
            "event=logging_init module=core status=ok level={} session_file={}",
            normalized_level,
            session_file.display()
        );

        Ok(LoggingState {
            level: normalized_level,
            log_dir: init_dir,
            session_file,
            _logger: logger,
        })
    })?;

    check_active(state, normalized_level, &normalized_dir)
}

/// Returns `(level, session_file)` when logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.session_file.clone()))
}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Renders one log line as `<timestamp> <prefix><message>`.
pub fn render_line(timestamp: &str, level: Level, message: &str) -> String {
    format!("{timestamp} {}{message}", level_prefix(level))
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn check_active(
    state: &LoggingState,
    level: &'static str,
    log_dir: &Path,
) -> Result<PathBuf, String> {
    if state.log_dir != log_dir {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        ));
    }
    Ok(state.session_file.clone())
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, String> {
    if log_dir.as_os_str().is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    if log_dir.is_absolute() {
        return Ok(log_dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(log_dir))
        .map_err(|err| format!("failed to resolve log_dir `{}`: {err}", log_dir.display()))
}

fn session_basename(epoch_seconds: i64) -> String {
    epoch_seconds.to_string()
}

fn session_file_name(basename: &str) -> String {
    format!("{basename}.{LOG_FILE_SUFFIX}")
}

fn level_prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR: ",
        Level::Warn => "WARN: ",
        Level::Info | Level::Debug | Level::Trace => "",
    }
}

fn session_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let message = record.args().to_string();
    write!(w, "{}", render_line(&timestamp, record.level(), &message))
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.get().is_some() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info);
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));

    let _ = PANIC_HOOK_INSTALLED.set(());
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{
        init_session_logging, logging_status, normalize_level, normalize_log_dir, render_line,
        sanitize_message, session_basename, session_file_name,
    };
    use log::Level;
    use std::path::Path;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(
            normalize_level("INFO").expect("INFO should normalize"),
            "info"
        );
        assert_eq!(
            normalize_level(" warning ").expect("warning should normalize"),
            "warn"
        );
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn normalize_log_dir_resolves_relative_path() {
        let resolved = normalize_log_dir(Path::new("logs")).expect("relative dir resolves");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("logs"));
        assert!(normalize_log_dir(Path::new("")).is_err());
    }

    #[test]
    fn session_file_is_named_by_epoch() {
        assert_eq!(session_file_name(&session_basename(1_733_961_600)), "1733961600.log");
    }

    #[test]
    fn render_line_prefixes_only_warnings_and_errors() {
        assert_eq!(
            render_line("2025-01-01 10:00:00", Level::Info, "Bot started"),
            "2025-01-01 10:00:00 Bot started"
        );
        assert_eq!(
            render_line("2025-01-01 10:00:00", Level::Error, "role missing"),
            "2025-01-01 10:00:00 ERROR: role missing"
        );
        assert_eq!(
            render_line("2025-01-01 10:00:00", Level::Warn, "slow"),
            "2025-01-01 10:00:00 WARN: slow"
        );
    }

    #[test]
    fn sanitize_message_removes_newlines_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert!(!sanitized.contains('\n'));
        assert!(!sanitized.contains('\r'));
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn init_is_idempotent_for_same_config_and_rejects_conflicts() {
        let log_dir = tempfile::tempdir().expect("temp dir");
        let other_dir = tempfile::tempdir().expect("temp dir");
        let nested = log_dir.path().join("logs");

        let session_file = init_session_logging("info", &nested).expect("first init should succeed");
        assert!(nested.is_dir());
        assert_eq!(session_file.parent(), Some(nested.as_path()));
        assert_eq!(
            session_file.extension().and_then(|ext| ext.to_str()),
            Some("log")
        );

        let again = init_session_logging("info", &nested).expect("same config should be idempotent");
        assert_eq!(again, session_file);

        let level_error =
            init_session_logging("debug", &nested).expect_err("level conflict should fail");
        assert!(level_error.contains("refusing to switch"));

        let dir_error = init_session_logging("info", other_dir.path())
            .expect_err("directory conflict should fail");
        assert!(dir_error.contains("refusing to switch"));

        log::info!("event=test_line module=core status=ok");
        let contents = std::fs::read_to_string(&session_file).expect("session file readable");
        assert!(contents.contains("event=test_line"));

        let (active_level, active_file) = logging_status().expect("logging should be active");
        assert_eq!(active_level, "info");
        assert_eq!(active_file, session_file);
    }
}
