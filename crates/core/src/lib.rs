//! Core library for the stagehand CLI
//!
//! This crate contains the tool execution and status framework: process
//! invocation, verbosity flag mapping, the tool engine with per-project
//! enablement and cached status, the version-adaptive lando status parser,
//! project configuration access, logging, and error handling.

pub mod composer;
pub mod errors;
pub mod git;
pub mod lando;
pub mod logging;
pub mod process;
pub mod project;
pub mod tool;
pub mod verbosity;

#[cfg(test)]
pub(crate) mod test_support;

/// Get the version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
