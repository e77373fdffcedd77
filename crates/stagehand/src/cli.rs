//! CLI argument parsing and dispatch

use crate::commands;
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use stagehand_core::logging;
use stagehand_core::project::Project;
use stagehand_core::verbosity::Verbosity;

/// Log format options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Stagehand subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Honks at you (a simple output test)
    Honk,

    /// Shows each tool's enablement and current status
    Status,

    /// Executes `lando drush` in the correct directory
    ///
    /// Only the -y/--yes drush option is recognized directly; quote other
    /// drush options or escape them with a double hyphen.
    Drush {
        /// Drush command to execute
        drush_command: Vec<String>,

        /// Answer "yes" to all drush prompts
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Aligns code, database, and files to a specified state
    Reset(commands::reset::ResetArgs),
}

/// Development-environment orchestration: wraps lando, git, and composer to
/// automate repeatable project sequences
#[derive(Debug, Parser)]
#[command(name = "stagehand", version, about)]
pub struct Cli {
    /// Increase tool output verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress forwarded tool output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log format (falls back to STAGEHAND_LOG_FORMAT, then text)
    #[arg(long = "log-format", value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Initialize logging and run the selected subcommand, returning its
    /// exit code
    pub fn dispatch(self) -> Result<i32> {
        let format = self.log_format.as_ref().map(|f| match f {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        });
        logging::init(format)?;

        let verbosity = Verbosity::from_flags(self.quiet, self.verbose);

        match self.command {
            Commands::Honk => commands::honk::execute(),
            Commands::Status => {
                let project = Project::discover()?;
                commands::status::execute(&project, verbosity)
            }
            Commands::Drush { drush_command, yes } => {
                let project = Project::discover()?;
                commands::drush::execute(
                    &project,
                    verbosity,
                    commands::drush::DrushArgs { drush_command, yes },
                )
            }
            Commands::Reset(args) => {
                let project = Project::discover()?;
                commands::reset::execute(&project, verbosity, args)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_flags_parse() {
        let cli = Cli::parse_from(["stagehand", "-vv", "status"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);

        let cli = Cli::parse_from(["stagehand", "-q", "honk"]);
        assert!(cli.quiet);
    }

    #[test]
    fn drush_collects_trailing_arguments() {
        let cli = Cli::parse_from(["stagehand", "drush", "cc", "all", "-y"]);
        match cli.command {
            Commands::Drush { drush_command, yes } => {
                assert_eq!(drush_command, vec!["cc", "all"]);
                assert!(yes);
            }
            other => panic!("expected drush, got {:?}", other),
        }
    }
}
