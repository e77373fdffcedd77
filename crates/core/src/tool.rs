//! The tool engine: binding, enablement, execution, and cached status
//!
//! A [`Tool`] wraps one external command-line program. Construction fixes
//! its name; [`Tool::bind`] resolves the executable on the host path and
//! runs kind-specific initialization, which decides whether the tool is
//! enabled for the current project. Per-tool specialization lives in a
//! [`ToolKind`] tagged union dispatched here rather than in a subclass
//! hierarchy; the lando, git, and composer modules supply the kind-specific
//! behavior.
//!
//! Expected failures never panic: an unresolvable executable or a failed
//! status update disables the tool and logs, and callers check
//! [`Tool::is_enabled`] / [`Tool::get_status`] before depending on it.

use crate::composer::ComposerState;
use crate::errors::{Result, ToolError};
use crate::git::WorkTreeStatus;
use crate::lando::{EnvironmentStatus, LandoState};
use crate::process::{ExecMode, ExecResult, ProcessRunner, ShellRunner};
use crate::project::Project;
use crate::verbosity::{self, Verbosity};
use crate::{composer, git, lando};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Destination for tool output forwarded to the user
pub trait OutputSink {
    fn writeln(&self, line: &str);
}

/// Default sink: the process's stdout
#[derive(Debug, Default, Clone)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn writeln(&self, line: &str) {
        println!("{}", line);
    }
}

/// Last-known status of a tool; the shape is tool-defined
#[derive(Debug, Clone, PartialEq)]
pub enum ToolStatus {
    /// Trivial status for tools with no richer report: the enabled flag
    Enabled(bool),
    /// A lando environment's running state
    Environment(EnvironmentStatus),
    /// A git work tree's cleanliness
    WorkTree(WorkTreeStatus),
}

impl ToolStatus {
    /// Whether this status reports a running environment
    pub fn is_running(&self) -> bool {
        matches!(self, ToolStatus::Environment(env) if env.running)
    }

    /// Whether this status reports a clean work tree
    pub fn is_clean(&self) -> bool {
        matches!(self, ToolStatus::WorkTree(wt) if wt.clean)
    }
}

/// Per-tool specialization, selected at construction
pub enum ToolKind {
    /// No specialization: stays disabled unless the caller enables it
    Generic,
    /// The containerized-environment manager
    Lando(LandoState),
    /// The version-control client
    Git,
    /// The dependency manager
    Composer(ComposerState),
}

impl ToolKind {
    /// The name this kind configures for itself, when it has one
    fn configured_name(&self) -> Option<&'static str> {
        match self {
            ToolKind::Generic => None,
            ToolKind::Lando(_) => Some("lando"),
            ToolKind::Git => Some("git"),
            ToolKind::Composer(_) => Some("composer"),
        }
    }
}

/// One bound external command-line tool
pub struct Tool {
    pub(crate) name: String,
    pub(crate) executable: Option<PathBuf>,
    pub(crate) enabled: bool,
    pub(crate) status: Option<ToolStatus>,
    pub(crate) verbosity: Verbosity,
    pub(crate) runner: Box<dyn ProcessRunner>,
    pub(crate) sink: Box<dyn OutputSink>,
    pub(crate) kind: ToolKind,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("executable", &self.executable)
            .field("enabled", &self.enabled)
            .field("status", &self.status)
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

impl Tool {
    /// Construct a tool of the given kind
    ///
    /// The kind's configuration step supplies the name unless the caller
    /// provides one; ending up with an empty name is the one fatal
    /// construction error in the framework.
    pub fn new(kind: ToolKind, name: Option<&str>) -> Result<Self> {
        let name = name
            .map(|n| n.to_string())
            .or_else(|| kind.configured_name().map(|n| n.to_string()))
            .unwrap_or_default();
        if name.is_empty() {
            return Err(ToolError::EmptyName.into());
        }
        Ok(Self {
            name,
            executable: None,
            enabled: false,
            status: None,
            verbosity: Verbosity::default(),
            runner: Box::new(ShellRunner::new()),
            sink: Box::new(StdoutSink),
            kind,
        })
    }

    /// The `lando` tool
    pub fn lando() -> Self {
        Self::new(ToolKind::Lando(LandoState::default()), None)
            .expect("lando kind configures a name")
    }

    /// The `git` tool
    pub fn git() -> Self {
        Self::new(ToolKind::Git, None).expect("git kind configures a name")
    }

    /// The `composer` tool
    pub fn composer() -> Self {
        Self::new(ToolKind::Composer(ComposerState::default()), None)
            .expect("composer kind configures a name")
    }

    /// Replace the process runner (tests script this seam)
    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replace the output sink
    pub fn with_sink(mut self, sink: Box<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The tool's name, immutable after construction
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved executable, if resolution succeeded
    pub fn executable(&self) -> Option<&PathBuf> {
        self.executable.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// The cached status without triggering a refresh
    pub fn status(&self) -> Option<&ToolStatus> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: ToolStatus) {
        self.status = Some(status);
    }

    /// Bind the tool to a project: resolve the executable and initialize
    ///
    /// Resolution searches the host command path for `executable_override`
    /// or, absent that, the tool's name. Failure logs an error and leaves
    /// the tool disabled; initialization runs either way so kinds can
    /// record why they are unusable. Verbosity is snapshotted here.
    pub fn bind(
        &mut self,
        project: &Project,
        verbosity: Verbosity,
        executable_override: Option<&str>,
    ) {
        self.verbosity = verbosity;

        let wanted = executable_override.unwrap_or(&self.name).to_string();
        match which::which(&wanted) {
            Ok(path) => {
                debug!("{{{}}} Executable is \"{}\"", self.name, path.display());
                self.executable = Some(path);
            }
            Err(e) => {
                error!("{{{}}} Cannot set executable \"{}\": {}", self.name, wanted, e);
            }
        }

        self.initialize(project);
    }

    /// Kind-specific initialization: load project config, probe tool state,
    /// and set the enabled flag. Generic tools stay disabled.
    fn initialize(&mut self, project: &Project) {
        match self.kind {
            ToolKind::Generic => {}
            ToolKind::Lando(_) => lando::initialize(self, project),
            ToolKind::Git => git::initialize(self, project),
            ToolKind::Composer(_) => composer::initialize(self, project),
        }
    }

    /// Decorate an argument string with this tool's verbosity flags
    pub fn apply_verbosity(&self, argv: &str) -> String {
        match self.kind {
            ToolKind::Lando(_) => verbosity::apply_lando(argv, self.verbosity),
            ToolKind::Git => verbosity::apply_git(argv, self.verbosity),
            ToolKind::Generic | ToolKind::Composer(_) => argv.to_string(),
        }
    }

    /// Execute the tool with the given arguments, capturing output
    ///
    /// A blank command (no resolved executable and no arguments) is a
    /// local, recoverable error: status 1, no process spawned.
    pub fn exec(&self, argv: &str) -> ExecResult {
        let executable = self
            .executable
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let command = format!("{} {}", executable, argv).trim().to_string();

        if command.is_empty() {
            warn!("{{{}}} Nothing to execute", self.name);
            return ExecResult::failure(command);
        }

        info!("{{{}}} $ {}", self.name, command);
        self.runner.run(&command, ExecMode::Captured)
    }

    /// Run a subcommand, refusing if the tool is not enabled
    pub fn run(&self, argv: &str) -> Option<i32> {
        if !self.is_enabled() {
            error!("{{{}}} Tool not enabled", self.name);
            return None;
        }
        Some(self.run_always(argv))
    }

    /// Run a subcommand regardless of enablement
    ///
    /// Arguments are decorated with verbosity flags, the command executes,
    /// and captured output is forwarded to the sink unless the effective
    /// verbosity is quiet. Returns the exit status.
    pub fn run_always(&self, argv: &str) -> i32 {
        let decorated = self.apply_verbosity(argv);
        let result = self.exec(&decorated);

        if self.verbosity != Verbosity::Quiet {
            for line in &result.output {
                self.sink.writeln(line);
            }
        }

        result.status
    }

    /// The cached status, computing it first if empty or `refresh` is set
    pub fn get_status(&mut self, refresh: bool) -> Option<&ToolStatus> {
        if self.status.is_none() || refresh {
            self.update_status(None);
        }
        self.status.as_ref()
    }

    /// Recompute and cache the status
    ///
    /// The base behavior records the enabled flag; lando and git replace it
    /// entirely. `args` is kind-specific (for lando, an environment name
    /// overriding the configured one).
    pub fn update_status(&mut self, args: Option<&str>) {
        match self.kind {
            ToolKind::Lando(_) => lando::update_status(self, args),
            ToolKind::Git => git::update_status(self, &[]),
            ToolKind::Generic | ToolKind::Composer(_) => {
                self.status = Some(ToolStatus::Enabled(self.enabled));
            }
        }
    }

    /// Ensure a lando environment is started (no-op for other kinds)
    pub fn require_started(&mut self) {
        if matches!(self.kind, ToolKind::Lando(_)) {
            lando::require_started(self);
        }
    }

    /// Whether the detected lando version requires an auth token to pull
    ///
    /// Triggers version detection if it has not happened yet. Always false
    /// for non-lando tools.
    pub fn needs_auth_token(&mut self) -> bool {
        if matches!(self.kind, ToolKind::Lando(_)) {
            lando::needs_auth_token(self)
        } else {
            false
        }
    }
}

/// Registry of bound tools, keyed by name
#[derive(Default)]
pub struct Toolbox {
    tools: BTreeMap<String, Tool>,
}

impl Toolbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `tool` against the project and register it under its name
    pub fn add(
        &mut self,
        mut tool: Tool,
        project: &Project,
        verbosity: Verbosity,
        executable_override: Option<&str>,
    ) {
        tool.bind(project, verbosity, executable_override);
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// The standard toolbox: lando, git, and composer
    pub fn standard(project: &Project, verbosity: Verbosity) -> Self {
        let mut toolbox = Self::new();
        toolbox.add(Tool::git(), project, verbosity, None);
        toolbox.add(Tool::composer(), project, verbosity, None);
        toolbox.add(Tool::lando(), project, verbosity, None);
        toolbox
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Mutable access to a registered tool
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Tool> {
        self.tools.get_mut(name).ok_or_else(|| {
            ToolError::NotRegistered {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Iterate over tools in name order
    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CaptureSink, ScriptRunner};

    fn generic_tool(runner: ScriptRunner) -> Tool {
        Tool::new(ToolKind::Generic, Some("widget"))
            .unwrap()
            .with_runner(Box::new(runner))
    }

    #[test]
    fn empty_name_is_a_construction_error() {
        assert!(Tool::new(ToolKind::Generic, None).is_err());
        assert!(Tool::new(ToolKind::Generic, Some("")).is_err());
    }

    #[test]
    fn kind_names_are_configured() {
        assert_eq!(Tool::lando().name(), "lando");
        assert_eq!(Tool::git().name(), "git");
        assert_eq!(Tool::composer().name(), "composer");
    }

    #[test]
    fn blank_command_short_circuits() {
        let runner = ScriptRunner::new();
        let tool = generic_tool(runner.clone());
        // No executable resolved, no args: nothing may spawn.
        let result = tool.exec("");
        assert_eq!(result.status, 1);
        assert!(result.output.is_empty());
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn exec_runs_args_even_without_executable() {
        // Matches the original contract: argv alone still forms a command.
        let runner = ScriptRunner::new().on("hello", &["hi"], 0);
        let tool = generic_tool(runner.clone());
        let result = tool.exec("hello");
        assert_eq!(result.status, 0);
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn run_refuses_when_disabled() {
        let runner = ScriptRunner::new();
        let tool = generic_tool(runner.clone());
        assert_eq!(tool.run("anything"), None);
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn run_always_forwards_output() {
        let runner = ScriptRunner::new().on("greet", &["hello", "world"], 0);
        let sink = CaptureSink::new();
        let mut tool = generic_tool(runner).with_sink(Box::new(sink.clone()));
        tool.enable();

        assert_eq!(tool.run("greet"), Some(0));
        assert_eq!(sink.lines(), vec!["hello", "world"]);
    }

    #[test]
    fn quiet_suppresses_forwarding() {
        let runner = ScriptRunner::new().on("greet", &["hello"], 0);
        let sink = CaptureSink::new();
        let mut tool = generic_tool(runner).with_sink(Box::new(sink.clone()));
        tool.enable();
        tool.verbosity = Verbosity::Quiet;

        assert_eq!(tool.run("greet"), Some(0));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn base_status_reflects_enabled_flag() {
        let mut tool = generic_tool(ScriptRunner::new());
        assert_eq!(tool.get_status(false), Some(&ToolStatus::Enabled(false)));
        tool.enable();
        // Cached until a refresh is forced.
        assert_eq!(tool.get_status(false), Some(&ToolStatus::Enabled(false)));
        assert_eq!(tool.get_status(true), Some(&ToolStatus::Enabled(true)));
    }

    #[test]
    fn enable_disable_are_idempotent() {
        let mut tool = generic_tool(ScriptRunner::new());
        tool.enable();
        tool.enable();
        assert!(tool.is_enabled());
        tool.disable();
        tool.disable();
        assert!(!tool.is_enabled());
    }

    #[test]
    fn toolbox_lookup() {
        let mut toolbox = Toolbox::new();
        let tool = generic_tool(ScriptRunner::new());
        toolbox.tools.insert(tool.name().to_string(), tool);

        assert!(toolbox.get("widget").is_some());
        assert!(toolbox.get_mut("widget").is_ok());
        assert!(toolbox.get_mut("missing").is_err());
    }
}
