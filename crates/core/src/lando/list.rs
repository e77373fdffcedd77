//! Normalization of `lando list` output across its five historical grammars
//!
//! The listing subcommand has emitted at least five incompatible output
//! shapes across lando's release history. Each is identified by the
//! detected version (see [`super::version`]) and normalized here into a
//! uniform [`EnvironmentStatus`] list:
//!
//! - [`ListFormat::Concatenated`]: bare `{...}` objects with no separators
//! - [`ListFormat::Array`]: a valid JSON array
//! - [`ListFormat::LooseObject`]: a JSON-ish object with bare keys,
//!   single-quoted strings, and terminal color escapes; repaired
//!   line-by-line before being parsed like `Object`
//! - [`ListFormat::Object`]: a JSON object keyed by environment name
//! - [`ListFormat::AppTable`]: a JSON array of flat records grouped by
//!   their `app` field
//!
//! The parser never errors on output it cannot classify: malformed input
//! degrades to an empty or partial record list, and the caller's
//! no-match-found warning path takes over.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// One of the historical `lando list` output grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// Oldest: a sequence of bare `{...}` objects with no separators
    Concatenated,
    /// A valid JSON array of environment records
    Array,
    /// A quasi-JSON object needing textual repair before decoding
    LooseObject,
    /// A valid JSON object keyed by environment name
    Object,
    /// Current: a JSON array of flat per-service records with an `app` field
    AppTable,
}

impl ListFormat {
    /// Whether `list` must be asked for JSON explicitly in this grammar
    pub fn wants_json_flag(self) -> bool {
        matches!(self, ListFormat::Object | ListFormat::AppTable)
    }
}

/// Normalized running/not-running state for one named environment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentStatus {
    /// Logical environment identifier
    pub name: String,
    pub running: bool,
    /// Tool-reported sub-records; present only in newer grammars
    pub info: Vec<Value>,
}

impl EnvironmentStatus {
    /// The record synthesized when the tool reports nothing at all
    pub fn absent() -> Self {
        Self {
            name: "*".to_string(),
            running: false,
            info: Vec::new(),
        }
    }
}

/// Parse raw `lando list` output lines according to `format`
///
/// Leading lines are skipped until something that looks like JSON starts
/// (lando prepends update-nag text). If nothing JSON-like remains, the tool
/// is present but reports nothing; a single `{name: "*", running: false}`
/// record is synthesized so callers treat the environment as not running.
pub fn parse_list(format: ListFormat, lines: &[String]) -> Vec<EnvironmentStatus> {
    let Some(start) = lines.iter().position(|line| {
        let trimmed = line.trim_start();
        trimmed.starts_with('[') || trimmed.starts_with('{')
    }) else {
        return vec![EnvironmentStatus::absent()];
    };
    let body = &lines[start..];

    match format {
        ListFormat::Concatenated => parse_records(&join_concatenated(body)),
        ListFormat::Array => parse_records(&body.join("\n")),
        ListFormat::LooseObject => {
            let repaired: Vec<String> = body.iter().map(|l| repair_loose_json(l)).collect();
            parse_keyed_object(&repaired.join("\n"))
        }
        ListFormat::Object => parse_keyed_object(&body.join("\n")),
        ListFormat::AppTable => parse_app_table(&body.join("\n")),
    }
}

/// Join a series of bare `{...}` objects into one JSON array
///
/// Commas are inserted after every line that closes an object, except the
/// final line, and the whole thing is wrapped in brackets.
fn join_concatenated(lines: &[String]) -> String {
    let mut joined = String::from("[");
    for (i, line) in lines.iter().enumerate() {
        joined.push_str(line);
        if line.trim() == "}" && i < lines.len() - 1 {
            joined.push(',');
        }
        joined.push('\n');
    }
    joined.push(']');
    joined
}

/// Decode an array of environment records (Concatenated and Array grammars)
fn parse_records(text: &str) -> Vec<EnvironmentStatus> {
    let records: Vec<Value> = match serde_json::from_str(text) {
        Ok(records) => records,
        Err(e) => {
            warn!("Could not decode environment list: {}", e);
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter_map(|record| {
            let name = record.get("name")?.as_str()?.to_string();
            let running = match record.get("running") {
                Some(Value::Bool(b)) => *b,
                Some(Value::String(s)) => s == "true" || s == "on",
                _ => false,
            };
            Some(EnvironmentStatus {
                name,
                running,
                info: Vec::new(),
            })
        })
        .collect()
}

/// Decode an object keyed by environment name (LooseObject after repair,
/// and Object grammars); a listed environment is a running one
fn parse_keyed_object(text: &str) -> Vec<EnvironmentStatus> {
    let object: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not decode environment list: {}", e);
            return Vec::new();
        }
    };
    let Some(map) = object.as_object() else {
        warn!("Environment list was not an object");
        return Vec::new();
    };

    map.iter()
        .map(|(name, value)| {
            let info = match value {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };
            EnvironmentStatus {
                name: name.clone(),
                running: true,
                info,
            }
        })
        .collect()
}

/// Decode the current grammar: flat per-service records grouped by `app`
///
/// One record is emitted per distinct app, in first-seen order, carrying
/// all of that app's sub-records. The global/background app is present
/// whenever the daemon is up, even with no project running.
fn parse_app_table(text: &str) -> Vec<EnvironmentStatus> {
    let records: Vec<Value> = match serde_json::from_str(text) {
        Ok(records) => records,
        Err(e) => {
            warn!("Could not decode environment list: {}", e);
            return Vec::new();
        }
    };

    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, Vec<Value>> =
        std::collections::HashMap::new();
    for record in records {
        let Some(app) = record.get("app").and_then(|v| v.as_str()) else {
            continue;
        };
        if !groups.contains_key(app) {
            order.push(app.to_string());
        }
        groups.entry(app.to_string()).or_default().push(record);
    }

    order
        .into_iter()
        .map(|app| {
            let info = groups.remove(&app).unwrap_or_default();
            EnvironmentStatus {
                name: app,
                running: true,
                info,
            }
        })
        .collect()
}

static ANSI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").unwrap());

static BARE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<lead>^\s*|[{,]\s*)(?P<key>[A-Za-z_][A-Za-z0-9_.-]*)\s*:").unwrap());

static SINGLE_QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']*)'").unwrap());

/// Repair one line of the quasi-JSON `LooseObject` grammar
///
/// Three targeted rewrites, in order: strip terminal color escapes, quote
/// bare keys, and convert single-quoted strings to double-quoted ones. A
/// pure text transform, independent of the JSON decoder, so grammar fixes
/// are testable in isolation.
pub fn repair_loose_json(line: &str) -> String {
    let stripped = ANSI_RE.replace_all(line, "");
    let keyed = BARE_KEY_RE.replace_all(&stripped, "${lead}\"${key}\":");
    SINGLE_QUOTED_RE.replace_all(&keyed, "\"$1\"").to_string()
}
