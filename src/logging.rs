//! Tracing subscriber setup.
//!
//! The sink comes from the `--log` option. Levels come from the logging
//! config: a global verbosity plus per-module overrides, turned into
//! `EnvFilter` directives. `RUST_LOG` wins when set.

use crate::config::{AppEnv, LoggingConfig};
use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber, fmt::writer::BoxMakeWriter};

/// Crate name used as the target prefix of module directives.
const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    /// Append to a file, without ANSI colors.
    File(PathBuf),
}

impl LogTarget {
    /// Parse `0`/`off`, `1`/`stdout`, `2`/`stderr`, or a filename.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }
}

/// Shape of each log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Local environments get text; every deployed environment gets JSON.
    pub fn for_env(app_env: AppEnv) -> Self {
        match app_env {
            AppEnv::Local => LogFormat::Text,
            AppEnv::Dev | AppEnv::Nonprod | AppEnv::Prod => LogFormat::Json,
        }
    }
}

/// Map a verbosity number to a tracing level.
pub fn verbosity_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Filter directives for the logging config, e.g. `info,dalil::api=trace`.
pub fn filter_directives(logging: &LoggingConfig) -> String {
    let mut directives = vec![level_name(logging.global_verbosity)];
    for module in logging.modules.keys() {
        let target = if module == CRATE_TARGET || module.starts_with(&format!("{CRATE_TARGET}::")) {
            module.clone()
        } else {
            format!("{CRATE_TARGET}::{module}")
        };
        directives.push(format!("{}={}", target, level_name(logging.verbosity(module))));
    }
    directives.join(",")
}

fn level_name(verbosity: u8) -> String {
    verbosity_level(verbosity).as_str().to_ascii_lowercase()
}

/// Install the global subscriber, formatted per [`LogFormat::for_env`].
pub fn init(target: &LogTarget, app_env: AppEnv, logging: &LoggingConfig) -> Result<()> {
    let (writer, ansi) = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(logging)));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);

    match LogFormat::for_env(app_env) {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }
    Ok(())
}
