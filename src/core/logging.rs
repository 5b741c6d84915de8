//! Logging setup.
//!
//! Logs go to stderr (stdout carries the stdio protocol) or are appended to a
//! file. The level filter sits behind a reload layer; on Unix, `SIGUSR1`
//! re-reads `N9E_MCP_LOG_LEVEL` and swaps the filter in place.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use super::config::LoggingConfig;
use super::error::{Error, Result};

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "N9E_MCP_LOG_LEVEL";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Handle to swap the active level filter.
pub type ReloadHandle = reload::Handle<EnvFilter, Registry>;

/// Install the global subscriber.
pub fn init(config: &LoggingConfig) -> Result<ReloadHandle> {
    let (filter, handle) = reload::Layer::new(build_filter(&config.level));
    let writer = make_writer(config.file.as_deref())?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(config.file.is_none())
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| Error::config(format!("failed to initialize logging: {}", e)))?;

    Ok(handle)
}

/// Map a level name to a filter. Unknown names fall back to `info`.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::default().add_directive(parse_level(level).into())
}

fn make_writer(file: Option<&Path>) -> Result<BoxMakeWriter> {
    match file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(std::io::stderr)),
    }
}

/// The level to use after a reload request.
///
/// A `.env` entry wins over the process environment, so an operator can edit
/// the file and signal the process.
pub fn configured_level() -> String {
    let from_dotenv = dotenvy::dotenv_iter().ok().and_then(|iter| {
        iter.flatten()
            .find(|(key, _)| key == LOG_LEVEL_ENV)
            .map(|(_, value)| value)
    });
    resolve_level(from_dotenv, std::env::var(LOG_LEVEL_ENV).ok())
}

fn resolve_level(from_dotenv: Option<String>, from_env: Option<String>) -> String {
    from_dotenv
        .into_iter()
        .chain(from_env)
        .map(|level| level.trim().to_string())
        .find(|level| !level.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Apply `level` through `handle`.
pub fn reload_level(handle: &ReloadHandle, level: &str) -> Result<()> {
    handle
        .reload(build_filter(level))
        .map_err(|e| Error::config(format!("failed to reload log level: {}", e)))?;
    info!(level = %parse_level(level), "Log level reloaded");
    Ok(())
}

/// Reload the level on every `SIGUSR1`.
#[cfg(unix)]
pub fn spawn_reload_on_signal(handle: ReloadHandle) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut signals = signal(SignalKind::user_defined1())?;
    tokio::spawn(async move {
        while signals.recv().await.is_some() {
            if let Err(e) = reload_level(&handle, &configured_level()) {
                tracing::warn!("{}", e);
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn spawn_reload_on_signal(_handle: ReloadHandle) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN "), LevelFilter::WARN);
        assert_eq!(parse_level("verbose"), LevelFilter::INFO);
        assert_eq!(parse_level(""), LevelFilter::INFO);
    }

    #[test]
    fn test_resolve_level_prefers_dotenv() {
        assert_eq!(
            resolve_level(Some("debug".into()), Some("error".into())),
            "debug"
        );
        assert_eq!(resolve_level(None, Some("error".into())), "error");
        assert_eq!(resolve_level(Some(" ".into()), Some("warn".into())), "warn");
        assert_eq!(resolve_level(None, None), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_file_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        std::fs::write(&path, "first\n").unwrap();

        let writer = make_writer(Some(&path)).unwrap();
        writer.make_writer().write_all(b"second\n").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_file_writer_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("server.log");
        assert!(matches!(make_writer(Some(&path)), Err(Error::Io(_))));
    }

    #[test]
    fn test_reload_swaps_filter() {
        let (layer, handle) = reload::Layer::new(build_filter("info"));
        let _subscriber = tracing_subscriber::registry().with(layer);

        reload_level(&handle, "trace").unwrap();
        let current = handle.with_current(|f| f.to_string()).unwrap();
        assert!(current.contains("trace"));
    }
}
