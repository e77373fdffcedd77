//! Logging and observability
//!
//! This module provides structured logging setup for the CLI. It supports
//! both traditional text-based logging and optional JSON formatting,
//! controlled at runtime via environment variables and CLI flags.
//!
//! All logging output is directed to stderr to preserve stdout for tool
//! output forwarded by the framework.

use anyhow::Result;
use std::{io, sync::Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the logging system with an optional format specification
///
/// Sets up tracing-subscriber with either JSON or text formatting based on
/// runtime configuration. Safe to call multiple times - subsequent calls are
/// no-ops.
///
/// ## Arguments
///
/// * `format` - Optional format specification string. Supports:
///   - `None` or `"text"` for human-readable text format
///   - `"json"` for structured JSON format
///
/// ## Environment Variables
///
/// * `STAGEHAND_LOG_FORMAT` - Controls the log output format ("json" for JSON,
///   any other value for text)
/// * `STAGEHAND_LOG` - Controls the logging filter level
/// * `RUST_LOG` - Standard Rust logging environment variable (used as fallback)
pub fn init(format: Option<&str>) -> Result<()> {
    INIT.call_once(|| {
        let filter = create_env_filter(None);

        let env_format = std::env::var("STAGEHAND_LOG_FORMAT").ok();
        let effective_format = format.or(env_format.as_deref()).unwrap_or("text");

        match effective_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(fmt::layer().json().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
            _ => {
                // Default to text format (including None, "text", or any other value)
                tracing_subscriber::registry()
                    .with(fmt::layer().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
        }

        tracing::debug!("Logging initialized with format: {}", effective_format);
    });

    Ok(())
}

/// Create the environment filter for log level control
///
/// An explicit level (from `-v`/`-q` flags) takes precedence; otherwise the
/// filter comes from `STAGEHAND_LOG`, then `RUST_LOG`, then defaults to `info`.
pub fn create_env_filter(level: Option<&str>) -> EnvFilter {
    if let Some(level) = level {
        return EnvFilter::new(level);
    }

    if let Ok(filter) = std::env::var("STAGEHAND_LOG") {
        return EnvFilter::new(filter);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
