//! The composer tool: dependency manager enablement
//!
//! Composer is enabled when the project root carries a non-empty
//! `composer.json`; the parsed manifest is kept as the tool's config.
//! Commands run through the same engine as every other tool.

use crate::project::Project;
use crate::tool::Tool;
use crate::tool::ToolKind;
use std::fs;
use tracing::debug;

/// Manifest file composer reads from the project root
pub const MANIFEST_FILE: &str = "composer.json";

/// Per-tool state carried by the composer [`ToolKind`]
#[derive(Debug, Default)]
pub struct ComposerState {
    /// Parsed project manifest, when the project has one
    pub(crate) manifest: Option<serde_json::Value>,
}

/// Enable the tool when the project has a usable manifest
pub(crate) fn initialize(tool: &mut Tool, project: &Project) {
    if tool.executable.is_none() {
        return;
    }

    let path = project.path(MANIFEST_FILE);
    let manifest = fs::read_to_string(&path)
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .filter(|value| value.as_object().is_some_and(|o| !o.is_empty()));

    // Stay silent when the project doesn't use composer.
    let Some(manifest) = manifest else {
        return;
    };
    debug!("{{composer}} Loaded manifest from {}", path.display());

    if let ToolKind::Composer(state) = &mut tool.kind {
        state.manifest = Some(manifest);
    }
    tool.enable();
}

/// The parsed manifest, if the tool was initialized against one
pub fn manifest(tool: &Tool) -> Option<&serde_json::Value> {
    match &tool.kind {
        ToolKind::Composer(state) => state.manifest.as_ref(),
        _ => None,
    }
}
