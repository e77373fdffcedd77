//! The git tool: enablement probe and work-tree status
//!
//! Git is enabled when an executable resolved and the project root is a
//! repository, determined by running `status 2>&1` there; the same output
//! seeds the cached work-tree status so initialization costs one process.

use crate::process::ExecResult;
use crate::project::Project;
use crate::tool::{Tool, ToolStatus};

/// Whether the work tree has anything to stage or commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkTreeStatus {
    pub clean: bool,
}

/// Enable the tool if the project root is a git repository
pub(crate) fn initialize(tool: &mut Tool, project: &Project) {
    if tool.executable.is_none() {
        return;
    }

    let exec = probe(tool, project);
    if exec.success() {
        tool.enable();
        set_status_from(tool, &exec.output);
    }
}

/// Recompute the work-tree status, probing again when no output is supplied
pub(crate) fn update_status(tool: &mut Tool, output: &[String]) {
    if output.is_empty() {
        let exec = tool.exec("status 2>&1");
        set_status_from(tool, &exec.output);
    } else {
        set_status_from(tool, output);
    }
}

fn probe(tool: &Tool, project: &Project) -> ExecResult {
    // `git status` only answers for the directory it runs in.
    tool.exec(&format!("-C {} status 2>&1", project.root().display()))
}

fn set_status_from(tool: &mut Tool, output: &[String]) {
    let clean = output
        .last()
        .map(|line| line.contains("nothing to commit"))
        .unwrap_or(false);
    tool.set_status(ToolStatus::WorkTree(WorkTreeStatus { clean }));
}
