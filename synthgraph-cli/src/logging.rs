//! Diagnostics for the `synthgraph` binary.
//!
//! Rendered summaries go to `stdout`; everything emitted through `tracing`
//! goes to `stderr`. Closing `cli.*` and `core.*` spans report their timings,
//! so a run of `synthgraph attachment` logs one `core.attachment.round` line
//! per round followed by `core.synthesize` and `cli.attachment`.

use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Selects between [`LogFormat::Human`] and [`LogFormat::Json`].
pub const LOG_FORMAT_ENV: &str = "SYNTHGRAPH_LOG_FORMAT";

/// Directive used when `RUST_LOG` is unset or unparsable.
const DEFAULT_DIRECTIVE: &str = "info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// How `stderr` diagnostics are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact lines for a terminal.
    #[default]
    Human,
    /// One JSON object per line with the enclosing span list, so `phase` and
    /// `code` of a failed command can be picked out by log tooling.
    Json,
}

impl LogFormat {
    /// Resolves the format from the value of [`LOG_FORMAT_ENV`].
    ///
    /// An unset variable selects [`LogFormat::Human`]; values are matched
    /// case-insensitively after trimming.
    ///
    /// # Errors
    /// Returns [`LoggingError::InvalidUnicode`] or
    /// [`LoggingError::UnsupportedFormat`].
    pub fn from_env_value(value: Result<String, env::VarError>) -> Result<Self, LoggingError> {
        let raw = match value {
            Ok(raw) => raw,
            Err(env::VarError::NotPresent) => return Ok(Self::Human),
            Err(source @ env::VarError::NotUnicode(_)) => {
                return Err(LoggingError::InvalidUnicode {
                    name: LOG_FORMAT_ENV,
                    source,
                });
            }
        };
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("human") {
            Ok(Self::Human)
        } else if trimmed.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(LoggingError::UnsupportedFormat {
                provided: trimmed.to_owned(),
            })
        }
    }
}

/// Failures that stop `synthgraph` before any command runs.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// [`LOG_FORMAT_ENV`] held bytes that are not UTF-8.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Always [`LOG_FORMAT_ENV`].
        name: &'static str,
        /// Lookup failure.
        #[source]
        source: env::VarError,
    },
    /// [`LOG_FORMAT_ENV`] named neither `human` nor `json`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Trimmed value as supplied.
        provided: String,
    },
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Rejection from `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs the `stderr` subscriber for this process.
///
/// Levels follow `RUST_LOG` (default `info`). Calling again is a no-op, and a
/// subscriber installed by an embedding process is left in place.
///
/// # Errors
/// Returns [`LoggingError`] when [`LOG_FORMAT_ENV`] cannot be resolved.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    let format = LogFormat::from_env_value(env::var(LOG_FORMAT_ENV))?;
    if let Err(source) = install(format) {
        eprintln!("synthgraph diagnostics use an existing subscriber: {source}");
    }
    let _ = INSTALLED.set(());
    Ok(())
}

fn install(format: LogFormat) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let spans = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let output = match format {
        LogFormat::Human => spans.boxed(),
        LogFormat::Json => spans
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // Records from `log`-based dependencies; a claimed slot is kept as is.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
}
