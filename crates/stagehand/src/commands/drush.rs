//! Drush command implementation
//!
//! A simple wrapper for `lando drush` so it can be executed anywhere in the
//! project, not just inside the main CMS directory. Ensures the lando
//! environment is started first.

use anyhow::Result;
use stagehand_core::project::Project;
use stagehand_core::tool::Toolbox;
use stagehand_core::verbosity::Verbosity;
use std::path::PathBuf;
use tracing::error;

/// Drush command arguments
#[derive(Debug, Clone)]
pub struct DrushArgs {
    /// Drush command with its arguments
    pub drush_command: Vec<String>,
    /// Append `--yes` to answer all drush prompts
    pub yes: bool,
}

/// Execute the `drush` command
pub fn execute(project: &Project, verbosity: Verbosity, args: DrushArgs) -> Result<i32> {
    let mut toolbox = Toolbox::standard(project, verbosity);
    let web_dir = find_web_dir(project);

    let lando = toolbox.get_mut("lando")?;
    if !lando.is_enabled() {
        error!("Cannot run without lando");
        return Ok(1);
    }

    std::env::set_current_dir(&web_dir)?;
    lando.require_started();

    let mut drush_command = args.drush_command;
    if args.yes {
        drush_command.push("--yes".to_string());
    }
    let argv = format!("drush {}", drush_command.join(" "));

    Ok(lando.run(argv.trim()).unwrap_or(1))
}

/// Identify the CMS directory based on the project's application type
///
/// Composer-based projects keep the document root in `web/`; older ones run
/// from the project root.
pub fn find_web_dir(project: &Project) -> PathBuf {
    let subdir = match project.config_string("appType").as_deref() {
        Some("drupal8") => "web",
        _ => "",
    };
    project.path(subdir)
}
