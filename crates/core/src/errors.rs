//! Error types and handling
//!
//! This module provides domain-specific error types for the tool framework.
//! The error taxonomy is structured with specific error enums for each domain
//! (Configuration, Tool, Version, Status) that are then wrapped in the main
//! StagehandError enum for unified error handling.
//!
//! Expected failure modes (missing executables, projects that do not use a
//! given tool, unmatched environments) are deliberately *not* errors: they
//! are represented as disabled tools, unmatched-status warnings, and nonzero
//! exit codes that orchestration code checks. The types here cover the
//! conditions callers genuinely cannot proceed past.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file parsing error
    #[error("Failed to parse configuration file: {message}")]
    Parsing { message: String },

    /// No project root could be located
    #[error("No project root found above {start}")]
    RootNotFound { start: String },

    /// Configuration file I/O error
    #[error("Failed to read configuration file")]
    Io(#[from] std::io::Error),
}

/// Tool-related errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// A tool finished configuration without a name; this is a programmer
    /// error and the only construction-time failure in the framework
    #[error("Tool name cannot be empty")]
    EmptyName,

    /// A tool was requested from the toolbox but was never registered
    #[error("Tool not registered: {name}")]
    NotRegistered { name: String },
}

/// Version-detection errors for the lando tool
#[derive(Error, Debug)]
pub enum VersionError {
    /// The version subcommand failed to execute
    #[error("Version command failed with exit status {status}")]
    CommandFailed { status: i32 },

    /// The version subcommand produced no usable output
    #[error("Version command produced no output")]
    EmptyOutput,

    /// The reported version string did not match the expected grammar
    #[error("Unrecognized version string: {line}")]
    Unrecognized { line: String },
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum StagehandError {
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Tool errors
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Version-detection errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using StagehandError
pub type Result<T> = std::result::Result<T, StagehandError>;
