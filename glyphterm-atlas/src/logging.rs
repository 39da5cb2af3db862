use std::path::PathBuf;

use color_eyre::Report;
use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for file output
    pub file_level: Level,
    /// Log level for console output
    pub console_level: Level,
    /// Directory for rolling log files; `None` disables file logging
    pub log_dir: Option<PathBuf>,
    /// JSON formatted file logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_level: Level::DEBUG,
            console_level: Level::WARN,
            log_dir: Some(Self::default_log_dir()),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// OS cache directory for glyphterm, e.g. `~/.cache/glyphterm` on Linux
    pub fn default_log_dir() -> PathBuf {
        ProjectDirs::from("", "", "glyphterm")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("glyphterm-logs"))
    }

    /// Applies the `GLYPHTERM_*` environment overrides to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let level = |key: &str| var(key).and_then(|v| v.parse::<Level>().ok());

        if let Some(level) = level("GLYPHTERM_LOG_LEVEL") {
            config.file_level = level;
            config.console_level = level;
        }
        if let Some(level) = level("GLYPHTERM_FILE_LOG_LEVEL") {
            config.file_level = level;
        }
        if let Some(level) = level("GLYPHTERM_CONSOLE_LOG_LEVEL") {
            config.console_level = level;
        }
        if let Some(dir) = var("GLYPHTERM_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if var("GLYPHTERM_NO_FILE_LOGS").is_some() {
            config.log_dir = None;
        }
        if var("GLYPHTERM_JSON_LOGS").is_some() {
            config.json_format = true;
        }

        config
    }
}

/// Installs the global subscriber; keep the returned guard alive until exit
/// so buffered file logs are flushed.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>, Report> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "glyphterm-atlas.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_filter = EnvFilter::builder()
            .with_default_directive(config.file_level.into())
            .from_env_lossy();

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(file_filter)
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(file_filter)
                .boxed()
        };

        layers.push(file_layer);
    }

    let console_filter = EnvFilter::builder()
        .with_default_directive(config.console_level.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter)
        .boxed();
    layers.push(console_layer);

    tracing_subscriber::registry().with(layers).init();

    Ok(guard)
}
