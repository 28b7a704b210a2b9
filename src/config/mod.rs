//! Logging configuration: the CLI level flag plus the optional JSON document.

use clap::ValueEnum;
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level choices exposed on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    /// Accepted for compatibility; tracing has no critical level
    Critical,
}

impl LogLevel {
    /// Filter directive fragment for this level
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

/// Structured logging-configuration document
///
/// All fields are optional:
///
/// ```json
/// { "level": "debug", "directives": ["hyper=warn"], "json": false, "ansi": true }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Base level; overrides the command-line flag
    #[serde(default)]
    pub level: Option<String>,

    /// Extra filter directives appended verbatim, e.g. "hyper=warn"
    #[serde(default)]
    pub directives: Vec<String>,

    /// Emit JSON log lines instead of the console format
    #[serde(default)]
    pub json: bool,

    /// Force ANSI color on or off; default follows terminal detection
    #[serde(default)]
    pub ansi: Option<bool>,
}

impl LogConfig {
    /// Level directive from the document, normalized to tracing levels
    pub fn level_directive(&self) -> Option<&str> {
        self.level.as_deref().map(|level| match level {
            "warning" => "warn",
            "critical" => "error",
            other => other,
        })
    }
}

/// Errors loading the logging-configuration document
#[derive(Debug, thiserror::Error)]
pub enum LogConfigError {
    #[error("cannot read log config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("file '{path}' is not valid json, cannot continue")]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the JSON logging-configuration document
pub fn load_log_config(path: &Path) -> Result<LogConfig, LogConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| LogConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LogConfigError::Invalid {
        path: path.display().to_string(),
        source,
    })
}

/// Initialize tracing for the process
///
/// Log lines go to stderr; stdout carries the interactive protocol.
/// `RUST_LOG` wins over both the flag and the document.
pub fn init_logging(level: LogLevel, config: Option<&LogConfig>) {
    let base = config
        .and_then(|c| c.level_directive())
        .unwrap_or_else(|| level.directive());

    let mut filter = format!("wikiseries={}", base);
    if let Some(config) = config {
        for directive in &config.directives {
            filter.push(',');
            filter.push_str(directive);
        }
    }

    let env_filter =
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(filter));

    let json = config.map(|c| c.json).unwrap_or(false);
    let ansi = config
        .and_then(|c| c.ansi)
        .unwrap_or_else(|| std::io::stderr().is_terminal());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
