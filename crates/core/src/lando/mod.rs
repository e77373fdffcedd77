//! The lando tool: enablement, version-adaptive status, reconciliation
//!
//! Lando is the containerized-environment manager. Its specialization does
//! three things on top of the base tool engine: it gates enablement on the
//! project's `.lando.yml`, it detects the installed lando version and picks
//! the matching `list` grammar (see [`version`] and [`list`]), and it keeps
//! an idempotent "ensure the environment is started" operation on top of
//! that unreliable output.
//!
//! Version detection must succeed before any list parsing is attempted; a
//! failure disables the tool for the session. A parsed list that contains
//! no record for the configured environment leaves the previously cached
//! status untouched and warns.

pub mod list;
pub mod version;

pub use list::{EnvironmentStatus, ListFormat};
pub use version::{Capabilities, Prerelease, VersionDescriptor};

use crate::project::Project;
use crate::tool::{Tool, ToolKind, ToolStatus};
use tracing::{debug, error, warn};

/// Config file lando reads from the project root
pub const CONFIG_FILE: &str = ".lando.yml";

/// Per-tool state carried by the lando [`ToolKind`]
#[derive(Debug, Default)]
pub struct LandoState {
    /// Parsed `.lando.yml`, when the project has one
    pub(crate) config: Option<serde_yaml::Value>,
    /// Detected version, cached after the first successful detection
    pub(crate) version: Option<VersionDescriptor>,
    /// Capabilities derived from the detected version
    pub(crate) capabilities: Option<Capabilities>,
}

impl LandoState {
    /// The environment name configured in `.lando.yml`
    fn environment_name(&self) -> Option<String> {
        self.config
            .as_ref()
            .and_then(|c| c.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

fn state(tool: &Tool) -> &LandoState {
    match &tool.kind {
        ToolKind::Lando(state) => state,
        _ => unreachable!("lando behavior invoked on a non-lando tool"),
    }
}

fn state_mut(tool: &mut Tool) -> &mut LandoState {
    match &mut tool.kind {
        ToolKind::Lando(state) => state,
        _ => unreachable!("lando behavior invoked on a non-lando tool"),
    }
}

/// Enable the tool when an executable resolved and the project uses lando
pub(crate) fn initialize(tool: &mut Tool, project: &Project) {
    tool.enable();

    if tool.executable.is_none() {
        tool.disable();
    }

    // Fail silently if the current project doesn't use lando.
    let config = project.load_config_file(CONFIG_FILE, None);
    if config.is_none() {
        tool.disable();
    }
    state_mut(tool).config = config;
}

/// Detect the installed lando version and derive capabilities
///
/// Cached after the first success. Any failure (exec, empty output,
/// unrecognized line) disables the tool for this session and returns None;
/// callers must short-circuit before touching list output.
pub(crate) fn ensure_capabilities(tool: &mut Tool) -> Option<Capabilities> {
    if let Some(caps) = state(tool).capabilities {
        return Some(caps);
    }

    let exec = tool.exec("version");
    if !exec.success() {
        error!("{{lando}} Version detection failed with status {}", exec.status);
        tool.disable();
        return None;
    }

    match version::parse_version_output(&exec.output) {
        Ok(detected) => {
            debug!("{{lando}} Detected version {}", detected.raw);
            let caps = version::capabilities(&detected);
            let state = state_mut(tool);
            state.version = Some(detected);
            state.capabilities = Some(caps);
            Some(caps)
        }
        Err(e) => {
            error!("{{lando}} {}", e);
            tool.disable();
            None
        }
    }
}

/// Whether the detected version requires an auth token to pull
pub(crate) fn needs_auth_token(tool: &mut Tool) -> bool {
    ensure_capabilities(tool).map(|c| c.needs_auth_token).unwrap_or(false)
}

/// Run `list`, parse it by the detected grammar, and cache the record
/// matching the configured (or overridden) environment name
///
/// No match leaves the previous cached status in place and warns; callers
/// observe the stale record rather than a cleared one.
pub(crate) fn update_status(tool: &mut Tool, name_override: Option<&str>) {
    let Some(caps) = ensure_capabilities(tool) else {
        return;
    };

    let mut argv = String::from("list");
    if caps.list_format.wants_json_flag() {
        argv.push_str(" --format json");
    }

    let exec = tool.exec(&argv);
    if !exec.success() {
        error!("{{lando}} `{}` failed with status {}", argv, exec.status);
        tool.disable();
        return;
    }
    let records = list::parse_list(caps.list_format, &exec.output);

    let name = match name_override
        .map(|n| n.to_string())
        .or_else(|| state(tool).environment_name())
    {
        Some(name) => name,
        None => {
            warn!("{{lando}} No lando environment configured or specified");
            return;
        }
    };

    let mut matched = false;
    for record in records {
        if record.name == name {
            tool.set_status(ToolStatus::Environment(record));
            matched = true;
        }
    }
    if !matched {
        warn!(
            "{{lando}} Unable to determine status for lando environment \"{}\"",
            name
        );
    }
}

/// Ensure the environment is started, starting it if necessary
///
/// Idempotent: an environment already reported running causes no process
/// invocation at all. Otherwise `start` is issued once, followed by a
/// single unconditional status refresh; callers must check the status
/// afterward rather than assume success.
pub(crate) fn require_started(tool: &mut Tool) {
    if !tool.is_enabled() {
        return;
    }

    let running = tool
        .get_status(false)
        .map(|status| status.is_running())
        .unwrap_or(false);

    if !running {
        tool.run("start");
        tool.update_status(None);
    }
}
