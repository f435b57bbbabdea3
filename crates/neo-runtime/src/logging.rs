//! Logging setup for neo bots.
//!
//! A [`Bot`](crate::Bot) never installs a subscriber on its own. Applications
//! call [`init_from_config`] once at startup and keep the returned guard for
//! as long as they log:
//!
//! ```rust,ignore
//! use neo_runtime::{config::load_config, logging};
//!
//! let config = load_config()?;
//! let _guard = logging::init_from_config(&config.logging)?;
//! ```
//!
//! [`LoggingBuilder`] adjusts a configuration in code before installing it.
//! `RUST_LOG`, when set, replaces the configured base level; per-target
//! filters still apply on top of it.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SpanEventConfig};

const DEFAULT_FILE_NAME: &str = "neo.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// File output was selected without a file path.
    #[error("log output is `file` but no file_path is configured")]
    MissingFilePath,

    /// The log file could not be opened.
    #[error("failed to open log file in {}: {source}", directory.display())]
    File {
        directory: PathBuf,
        #[source]
        source: InitError,
    },

    /// Another global subscriber is already installed.
    #[error("a global logger is already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Result type for logging setup.
pub type LoggingResult<T> = Result<T, LoggingError>;

/// Keeps the background file writer alive.
///
/// Dropping it flushes pending lines; file output stops afterwards. Holds
/// nothing for stdout and stderr output.
#[must_use = "dropping the guard stops file logging"]
#[derive(Default)]
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

/// Installs the global subscriber described by `config`.
pub fn init_from_config(config: &LoggingConfig) -> LoggingResult<LoggingGuard> {
    LoggingBuilder::from_config(config).try_init()
}

/// Builds a subscriber from a [`LoggingConfig`] plus code-level overrides.
///
/// ```rust,ignore
/// use neo_runtime::config::{LogLevel, SpanEventConfig};
/// use neo_runtime::logging::LoggingBuilder;
///
/// let _guard = LoggingBuilder::new()
///     .level(LogLevel::Debug)
///     .directive("neo_framework=trace")
///     .span_events(SpanEventConfig::LIFECYCLE)
///     .try_init()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggingBuilder {
    config: LoggingConfig,
    directives: Vec<String>,
}

impl LoggingBuilder {
    /// Starts from the default configuration: compact lines on stdout at
    /// `info`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `config`.
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            config: config.clone(),
            directives: Vec::new(),
        }
    }

    /// Sets the base level.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Adds a raw filter directive, e.g. `neo_runtime::poller=trace`.
    ///
    /// Directives added here are applied after the configured filters.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Sets the span events to log.
    pub fn span_events(mut self, events: SpanEventConfig) -> Self {
        self.config.span_events = events;
        self
    }

    /// Sets the line format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Writes to stdout or stderr. Use [`file`](Self::file) for file output.
    pub fn output(mut self, output: LogOutput) -> Self {
        self.config.output = output;
        self
    }

    /// Writes to `path`, rotated by `rotation`.
    pub fn file(mut self, path: impl Into<PathBuf>, rotation: LogRotation) -> Self {
        self.config.output = LogOutput::File;
        self.config.file_path = Some(path.into());
        self.config.rotation = rotation;
        self
    }

    /// Configured per-target filters in a stable order, then the extra
    /// directives.
    fn all_directives(&self) -> Vec<String> {
        let mut filters: Vec<_> = self.config.filters.iter().collect();
        filters.sort_by(|a, b| a.0.cmp(b.0));
        filters
            .into_iter()
            .map(|(target, level)| format!("{target}={level}"))
            .chain(self.directives.iter().cloned())
            .collect()
    }

    fn build_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_str()));

        for directive in self.all_directives() {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(e) => eprintln!("ignoring invalid log directive `{directive}`: {e}"),
            }
        }

        filter
    }

    fn fmt_layer<W>(&self, writer: W, ansi: bool) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_span_events(fmt_span(self.config.span_events))
            .with_thread_ids(self.config.thread_ids)
            .with_file(self.config.file_location)
            .with_line_number(self.config.file_location);

        match self.config.format {
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Full => layer.boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => layer.json().boxed(),
        }
    }

    /// Installs the subscriber as the global default.
    ///
    /// # Errors
    ///
    /// Fails if file output has no usable path, or if a global subscriber is
    /// already installed.
    pub fn try_init(self) -> LoggingResult<LoggingGuard> {
        let (layer, guard) = match self.config.output {
            LogOutput::Stdout => (self.fmt_layer(std::io::stdout, true), LoggingGuard::default()),
            LogOutput::Stderr => (self.fmt_layer(std::io::stderr, true), LoggingGuard::default()),
            LogOutput::File => {
                let path = self
                    .config
                    .file_path
                    .as_deref()
                    .ok_or(LoggingError::MissingFilePath)?;
                let appender = file_appender(path, self.config.rotation)?;
                let (writer, worker) = tracing_appender::non_blocking(appender);
                let guard = LoggingGuard {
                    _worker: Some(worker),
                };
                (self.fmt_layer(writer, false), guard)
            }
        };

        tracing_subscriber::registry()
            .with(layer)
            .with(self.build_filter())
            .try_init()?;
        Ok(guard)
    }
}

fn fmt_span(events: SpanEventConfig) -> FmtSpan {
    [
        (events.new, FmtSpan::NEW),
        (events.enter, FmtSpan::ENTER),
        (events.exit, FmtSpan::EXIT),
        (events.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |acc, (_, span)| acc | span)
}

fn file_appender(path: &Path, rotation: LogRotation) -> LoggingResult<RollingFileAppender> {
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .unwrap_or_else(|| OsStr::new(DEFAULT_FILE_NAME))
        .to_string_lossy();
    let rotation = match rotation {
        LogRotation::Never => Rotation::NEVER,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
    };

    RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|source| LoggingError::File {
            directory: directory.to_path_buf(),
            source,
        })
}
