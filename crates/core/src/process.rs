//! External process execution
//!
//! This module is the leaf of the framework: it invokes an external
//! executable and returns captured stdout lines plus the integer exit
//! status. Execution is synchronous and blocking throughout; a hung child
//! blocks the call indefinitely (no deadline is modeled).
//!
//! Two modes are supported. `Captured` runs the command line through the
//! shell and collects stdout for the caller to parse or forward. `Attached`
//! wires the child to the controlling terminal so it can prompt the user,
//! and still returns a structured exit status rather than relying on
//! side-effectful prints.

use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// How a command's I/O is wired up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Run via the shell, capture stdout line-by-line
    Captured,
    /// Inherit the controlling terminal (stdin/stdout/stderr) for prompts
    Attached,
}

/// Result of one external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// The full command line that was (or would have been) executed
    pub command: String,
    /// Captured stdout lines; empty in attached mode
    pub output: Vec<String>,
    /// Process exit status; 1 when the process could not be spawned
    pub status: i32,
}

impl ExecResult {
    /// Synthetic failure result for commands that never spawned a process
    pub fn failure(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            output: Vec::new(),
            status: 1,
        }
    }

    /// Whether the command exited successfully
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Abstraction over process invocation so tool logic can be exercised
/// against scripted output in tests
pub trait ProcessRunner {
    /// Execute `command` in the given mode, blocking until it exits
    fn run(&self, command: &str, mode: ExecMode) -> ExecResult;
}

/// Production runner that spawns real processes
#[derive(Debug, Default, Clone)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    fn run_captured(&self, command: &str) -> ExecResult {
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                let lines = String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .map(|line| line.to_string())
                    .collect();
                ExecResult {
                    command: command.to_string(),
                    output: lines,
                    status: output.status.code().unwrap_or(1),
                }
            }
            Err(e) => {
                warn!("Failed to spawn command '{}': {}", command, e);
                ExecResult::failure(command)
            }
        }
    }

    fn run_attached(&self, command: &str) -> ExecResult {
        let argv = match shell_words::split(command) {
            Ok(argv) if !argv.is_empty() => argv,
            Ok(_) => {
                warn!("Refusing to run empty command in attached mode");
                return ExecResult::failure(command);
            }
            Err(e) => {
                warn!("Failed to split command '{}': {}", command, e);
                return ExecResult::failure(command);
            }
        };

        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();

        match status {
            Ok(status) => ExecResult {
                command: command.to_string(),
                output: Vec::new(),
                status: status.code().unwrap_or(1),
            },
            Err(e) => {
                warn!("Failed to spawn command '{}': {}", command, e);
                ExecResult::failure(command)
            }
        }
    }
}

impl ProcessRunner for ShellRunner {
    fn run(&self, command: &str, mode: ExecMode) -> ExecResult {
        debug!("Executing ({:?}): {}", mode, command);
        match mode {
            ExecMode::Captured => self.run_captured(command),
            ExecMode::Attached => self.run_attached(command),
        }
    }
}
