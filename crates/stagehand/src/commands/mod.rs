//! Command implementations
//!
//! This module contains implementations for all CLI subcommands. Each is a
//! thin orchestration layer over the tool framework in `stagehand-core`.

pub mod drush;
pub mod honk;
pub mod reset;
pub mod status;
