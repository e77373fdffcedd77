//! Reset command implementation
//!
//! Aligns the local environment with a specified state: checks out and
//! pulls the requested branch, reinstalls dependencies, makes sure the
//! lando environment is running, pulls database and files from the hosting
//! environment, and runs the CMS cache/config sequence.

use crate::commands::drush::find_web_dir;
use anyhow::Result;
use clap::Args;
use stagehand_core::project::Project;
use stagehand_core::tool::Toolbox;
use stagehand_core::verbosity::Verbosity;
use tracing::{debug, error, warn};

/// Reset command arguments; unset options fall back to the project's
/// `reset:` config table, then to defaults
#[derive(Debug, Clone, Args)]
pub struct ResetArgs {
    /// Hosting machine token to use
    #[arg(short = 'a', long)]
    pub auth: Option<String>,

    /// Git branch to use [default: "master"]
    #[arg(short = 'b', long)]
    pub branch: Option<String>,

    /// Environment to load database and files from [default: "dev"]
    #[arg(short = 'c', long)]
    pub content: Option<String>,

    /// Environment to load database from
    #[arg(short = 'd', long)]
    pub database: Option<String>,

    /// Environment to copy files from
    #[arg(short = 'f', long)]
    pub files: Option<String>,

    /// Admin account to have local password set
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Local password for admin account
    #[arg(short = 'p', long)]
    pub password: Option<String>,
}

/// The desired end state of the reset
#[derive(Debug, Clone)]
struct Params {
    auth: String,
    branch: String,
    database: String,
    files: String,
    rsync: bool,
    username: String,
    password: String,
}

impl Params {
    /// Merge defaults, the project's `reset:` config table, and CLI options
    fn resolve(project: &Project, args: &ResetArgs) -> Self {
        let config = project.config_table("reset");
        let from_config = |key: &str| -> Option<String> {
            config
                .and_then(|t| t.get(key))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        let auth = args.auth.clone().or_else(|| from_config("auth")).unwrap_or_default();
        let branch = args
            .branch
            .clone()
            .or_else(|| from_config("branch"))
            .unwrap_or_else(|| "master".to_string());
        let content = args
            .content
            .clone()
            .or_else(|| from_config("content"))
            .unwrap_or_else(|| "dev".to_string());
        let rsync = config
            .and_then(|t| t.get("rsync"))
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        let username = args
            .username
            .clone()
            .or_else(|| from_config("username"))
            .unwrap_or_default();
        let mut password = args
            .password
            .clone()
            .or_else(|| from_config("password"))
            .unwrap_or_default();

        // Specifying a database overrides the content source; a file source
        // overrides whichever of those is in effect.
        let mut database = content.clone();
        let mut files = content;
        if let Some(d) = &args.database {
            database = d.clone();
            files = d.clone();
        }
        if let Some(f) = &args.files {
            files = f.clone();
        }

        if !username.is_empty() && password.is_empty() {
            password = prompt_password(&username);
        }

        let params = Self {
            auth,
            branch,
            database,
            files,
            rsync,
            username,
            password,
        };
        debug!("Reset parameters: {:?}", params);
        params
    }
}

/// Ask for the admin password on the terminal; an empty answer means the
/// password is not reset
fn prompt_password(username: &str) -> String {
    dialoguer::Password::new()
        .with_prompt(format!("Enter a password for {}", username))
        .allow_empty_password(true)
        .interact()
        .unwrap_or_default()
}

/// Execute the `reset` command
pub fn execute(project: &Project, verbosity: Verbosity, args: ResetArgs) -> Result<i32> {
    match project.config_string("appType").as_deref() {
        Some("drupal7") => {
            let params = Params::resolve(project, &args);
            run_reset(project, verbosity, &params, SiteKind::Drupal7)
        }
        Some("drupal8") => {
            let params = Params::resolve(project, &args);
            run_reset(project, verbosity, &params, SiteKind::Drupal8)
        }
        Some("stagehand") => {
            warn!("Can't reset self");
            Ok(1)
        }
        Some(other) => {
            error!("Unrecognized application type \"{}\"", other);
            Ok(1)
        }
        None => {
            error!("No application type specified");
            Ok(1)
        }
    }
}

/// Which reset sequence the application type calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiteKind {
    /// Pre-composer site: no dependency install, `cc all` cache clear
    Drupal7,
    /// Composer-based site: composer install, `cr` / config-import sequence
    Drupal8,
}

impl SiteKind {
    /// The drush cache/config steps, with a password reset spliced in when
    /// the parameters ask for one
    fn drush_sequence(self, params: &Params) -> Vec<String> {
        let upwd = (!params.username.is_empty() && !params.password.is_empty()).then(|| {
            format!("upwd {} --password=\"{}\"", params.username, params.password)
        });

        match self {
            SiteKind::Drupal7 => {
                let mut sequence = vec!["cc all".to_string()];
                if let Some(upwd) = upwd {
                    sequence.push(upwd);
                    sequence.push("cc all".to_string());
                }
                sequence
            }
            SiteKind::Drupal8 => {
                let mut sequence = vec![
                    "cr".to_string(),
                    "csim config_dev --yes".to_string(),
                    "updb --yes".to_string(),
                ];
                if let Some(upwd) = upwd {
                    sequence.push(upwd);
                }
                sequence.push("cr".to_string());
                sequence
            }
        }
    }
}

/// Run the reset sequence against the project's tools
fn run_reset(
    project: &Project,
    verbosity: Verbosity,
    params: &Params,
    kind: SiteKind,
) -> Result<i32> {
    let mut toolbox = Toolbox::standard(project, verbosity);
    std::env::set_current_dir(project.root())?;

    let git = toolbox.get_mut("git")?;
    let clean = git
        .get_status(false)
        .map(|status| status.is_clean())
        .unwrap_or(false);
    if !clean {
        error!("Working directory not clean. Aborting.");
        return Ok(1);
    }
    git.run(&format!("checkout {}", params.branch));
    git.run("pull");

    if kind == SiteKind::Drupal8 {
        toolbox.get_mut("composer")?.run("install");
    }

    let lando = toolbox.get_mut("lando")?;
    if !lando.is_enabled() {
        error!("Cannot reset without lando");
        return Ok(1);
    }
    lando.require_started();

    let mut pull = format!(
        "pull --code=none --database={} --files={}",
        params.database, params.files
    );
    if params.rsync {
        pull.push_str(" --rsync");
    }
    if lando.needs_auth_token() {
        if params.auth.is_empty() {
            error!("This version of lando requires an auth token to pull. Aborting.");
            return Ok(1);
        }
        pull.push_str(&format!(" --auth={}", params.auth));
    }
    lando.run(&pull);

    std::env::set_current_dir(find_web_dir(project))?;
    for step in kind.drush_sequence(params) {
        lando.run(&format!("drush {}", step));
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_core::project::{CONFIG_DIR, CONFIG_FILE};
    use std::fs;
    use tempfile::TempDir;

    fn project_with(config: &str) -> (TempDir, Project) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        fs::write(dir.path().join(CONFIG_DIR).join(CONFIG_FILE), config).unwrap();
        let project = Project::load(dir.path().to_path_buf()).unwrap();
        (dir, project)
    }

    fn no_args() -> ResetArgs {
        ResetArgs {
            auth: None,
            branch: None,
            content: None,
            database: None,
            files: None,
            username: None,
            password: None,
        }
    }

    #[test]
    fn params_default_when_unconfigured() {
        let (_dir, project) = project_with("appType: drupal8\n");
        let params = Params::resolve(&project, &no_args());
        assert_eq!(params.branch, "master");
        assert_eq!(params.database, "dev");
        assert_eq!(params.files, "dev");
        assert!(params.rsync);
        assert!(params.auth.is_empty());
        assert!(params.username.is_empty());
    }

    #[test]
    fn params_read_the_reset_config_table() {
        let (_dir, project) = project_with(
            "appType: drupal8\nreset:\n  branch: main\n  content: test\n  rsync: false\n",
        );
        let params = Params::resolve(&project, &no_args());
        assert_eq!(params.branch, "main");
        assert_eq!(params.database, "test");
        assert_eq!(params.files, "test");
        assert!(!params.rsync);
    }

    #[test]
    fn cli_options_override_config() {
        let (_dir, project) = project_with("appType: drupal8\nreset:\n  branch: main\n");
        let mut args = no_args();
        args.branch = Some("feature".to_string());
        let params = Params::resolve(&project, &args);
        assert_eq!(params.branch, "feature");
    }

    fn params_with_login(username: &str, password: &str) -> Params {
        Params {
            auth: String::new(),
            branch: "master".to_string(),
            database: "dev".to_string(),
            files: "dev".to_string(),
            rsync: true,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn drupal7_repeats_cache_clear_only_after_password_reset() {
        let plain = SiteKind::Drupal7.drush_sequence(&params_with_login("", ""));
        assert_eq!(plain, vec!["cc all"]);

        let with_login = SiteKind::Drupal7.drush_sequence(&params_with_login("admin", "s3cret"));
        assert_eq!(
            with_login,
            vec!["cc all", "upwd admin --password=\"s3cret\"", "cc all"]
        );
    }

    #[test]
    fn drupal8_always_ends_with_a_cache_rebuild() {
        let plain = SiteKind::Drupal8.drush_sequence(&params_with_login("", ""));
        assert_eq!(
            plain,
            vec!["cr", "csim config_dev --yes", "updb --yes", "cr"]
        );

        let with_login = SiteKind::Drupal8.drush_sequence(&params_with_login("admin", "s3cret"));
        assert_eq!(with_login.len(), 5);
        assert_eq!(with_login[3], "upwd admin --password=\"s3cret\"");
        assert_eq!(with_login[4], "cr");
    }

    #[test]
    fn database_option_also_sets_files() {
        let (_dir, project) = project_with("appType: drupal8\n");
        let mut args = no_args();
        args.database = Some("prod".to_string());
        let params = Params::resolve(&project, &args);
        assert_eq!(params.database, "prod");
        assert_eq!(params.files, "prod");

        args.files = Some("test".to_string());
        let params = Params::resolve(&project, &args);
        assert_eq!(params.database, "prod");
        assert_eq!(params.files, "test");
    }
}
