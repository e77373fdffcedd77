//! Status command implementation
//!
//! Prints each tool's executable, enablement, and current status record.

use anyhow::Result;
use stagehand_core::project::Project;
use stagehand_core::tool::{Tool, Toolbox, ToolStatus};
use stagehand_core::verbosity::Verbosity;

/// Execute the `status` command
pub fn execute(project: &Project, verbosity: Verbosity) -> Result<i32> {
    let mut toolbox = Toolbox::standard(project, verbosity);

    println!("Project root: {}", project.root().display());

    let names: Vec<String> = toolbox.iter().map(|t| t.name().to_string()).collect();
    for name in names {
        let tool = toolbox.get_mut(&name)?;
        let executable = tool
            .executable()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let enabled = if tool.is_enabled() { "enabled" } else { "disabled" };
        let status = describe_status(tool);
        println!("{:<10} {:<9} {:<30} {}", name, enabled, executable, status);
    }

    Ok(0)
}

fn describe_status(tool: &mut Tool) -> String {
    if !tool.is_enabled() {
        return "-".to_string();
    }
    match tool.get_status(false) {
        Some(ToolStatus::Enabled(flag)) => format!("enabled={}", flag),
        Some(ToolStatus::Environment(env)) => format!(
            "environment \"{}\" {}",
            env.name,
            if env.running { "running" } else { "not running" }
        ),
        Some(ToolStatus::WorkTree(wt)) => {
            format!("work tree {}", if wt.clean { "clean" } else { "dirty" })
        }
        None => "unknown".to_string(),
    }
}
