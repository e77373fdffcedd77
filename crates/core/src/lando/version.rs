//! Lando version detection and the version-to-capability decision table
//!
//! Lando reports its version as `v<major>.<minor>.<patch>` with an optional
//! `-<channel>.<iteration>` pre-release suffix, usually after a few lines of
//! update-nag text. The parsed version drives two behaviors that changed
//! across the 3.0.0 release candidates: whether `pull` requires an auth
//! token, and which of the five historical `lando list` output grammars the
//! installed binary emits.
//!
//! The mapping is a data-driven table rather than branching logic: each row
//! is (channel, minimum iteration, capabilities), and the last row whose
//! channel matches and whose minimum the iteration meets wins. Adding a new
//! grammar is a table entry.

use super::list::ListFormat;
use crate::errors::{Result, VersionError};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// The major version this framework was written against
pub const EXPECTED_MAJOR: u64 = 3;

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v(\d+)\.(\d+)\.(\d+)(?:-(\S+))?$").unwrap());

static PRERELEASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)\.(\d+)$").unwrap());

/// A parsed pre-release suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerelease {
    /// Channel string, lowercased ("alpha", "beta", "rc", ...)
    pub channel: String,
    /// Ordinal within the channel
    pub iteration: u32,
}

/// The version lando reported, split into comparable pieces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    /// The exact line the tool printed
    pub raw: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Pre-release channel and iteration, when the suffix parsed
    pub prerelease: Option<Prerelease>,
    /// A suffix that did not match the pre-release grammar, kept verbatim
    pub unrecognized_suffix: Option<String>,
}

/// Behavior switches derived from the version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether `pull` requires `--auth=<token>`
    pub needs_auth_token: bool,
    /// Which `lando list` grammar the binary emits
    pub list_format: ListFormat,
}

impl Default for Capabilities {
    /// Any recognized version gets the newest behavior unless a table row
    /// overrides it
    fn default() -> Self {
        Self {
            needs_auth_token: true,
            list_format: ListFormat::AppTable,
        }
    }
}

/// Pre-release overrides for 3.0.0: (channel, minimum iteration,
/// needs_auth_token, list_format). Later rows shadow earlier ones, so each
/// channel's rows run oldest to newest.
const PRERELEASE_RULES: &[(&str, u32, bool, ListFormat)] = &[
    ("alpha", 0, false, ListFormat::Concatenated),
    ("beta", 0, false, ListFormat::Concatenated),
    ("beta", 37, false, ListFormat::Array),
    ("rc", 1, false, ListFormat::Array),
    ("rc", 2, true, ListFormat::LooseObject),
    ("rc", 13, true, ListFormat::Object),
];

/// Parse the version from `lando version` output
///
/// The version is the *last* non-empty line; earlier lines may be unrelated
/// upgrade-nag text. Empty output or a non-matching line is an error (the
/// caller disables the tool for the session).
pub fn parse_version_output(lines: &[String]) -> Result<VersionDescriptor> {
    let line = lines
        .iter()
        .rev()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .ok_or(VersionError::EmptyOutput)?;

    let captures = VERSION_RE.captures(line).ok_or_else(|| VersionError::Unrecognized {
        line: line.to_string(),
    })?;

    let major = captures[1].parse().unwrap_or(0);
    let minor = captures[2].parse().unwrap_or(0);
    let patch = captures[3].parse().unwrap_or(0);

    let mut prerelease = None;
    let mut unrecognized_suffix = None;
    if let Some(suffix) = captures.get(4) {
        match PRERELEASE_RE.captures(suffix.as_str()) {
            Some(pre) => {
                prerelease = Some(Prerelease {
                    channel: pre[1].to_lowercase(),
                    iteration: pre[2].parse().unwrap_or(0),
                });
            }
            None => {
                warn!(
                    "Unrecognized version suffix \"{}\"; lando support may be degraded",
                    suffix.as_str()
                );
                unrecognized_suffix = Some(suffix.as_str().to_string());
            }
        }
    }

    Ok(VersionDescriptor {
        raw: line.to_string(),
        major,
        minor,
        patch,
        prerelease,
        unrecognized_suffix,
    })
}

/// Derive capabilities from a parsed version
///
/// A pure function: the same version always yields the same capability set.
/// A major version other than 3 warns but keeps the defaults; the degraded
/// behavior is accepted rather than guessing at grammars that do not exist
/// yet.
pub fn capabilities(version: &VersionDescriptor) -> Capabilities {
    let defaults = Capabilities::default();

    if version.major != EXPECTED_MAJOR {
        warn!(
            "Expected lando major version {}, found {}; continuing with current defaults",
            EXPECTED_MAJOR, version.raw
        );
        return defaults;
    }

    if (version.major, version.minor, version.patch) != (3, 0, 0) {
        return defaults;
    }

    let Some(pre) = &version.prerelease else {
        return defaults;
    };

    let mut caps = defaults;
    let mut matched = false;
    for (channel, min_iteration, needs_auth_token, list_format) in PRERELEASE_RULES {
        if *channel == pre.channel && pre.iteration >= *min_iteration {
            caps = Capabilities {
                needs_auth_token: *needs_auth_token,
                list_format: *list_format,
            };
            matched = true;
        }
    }
    if !matched {
        warn!(
            "Unrecognized prerelease channel \"{}\"; lando support may be degraded",
            pre.channel
        );
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    fn caps_for(version_line: &str) -> Capabilities {
        let version = parse_version_output(&lines(&[version_line])).unwrap();
        capabilities(&version)
    }

    #[test]
    fn parses_stable_version() {
        let version = parse_version_output(&lines(&["v3.1.4"])).unwrap();
        assert_eq!((version.major, version.minor, version.patch), (3, 1, 4));
        assert!(version.prerelease.is_none());
        assert_eq!(version.raw, "v3.1.4");
    }

    #[test]
    fn takes_last_nonempty_line_past_update_nag() {
        let output = lines(&[
            "  There is an update available!!!",
            "  Run lando update to get it",
            "",
            "v3.0.0-rc.13",
            "",
        ]);
        let version = parse_version_output(&output).unwrap();
        assert_eq!(version.raw, "v3.0.0-rc.13");
        assert_eq!(
            version.prerelease,
            Some(Prerelease {
                channel: "rc".to_string(),
                iteration: 13
            })
        );
    }

    #[test]
    fn empty_output_is_an_error() {
        assert!(parse_version_output(&[]).is_err());
        assert!(parse_version_output(&lines(&["", "   "])).is_err());
    }

    #[test]
    fn nonmatching_line_is_an_error() {
        assert!(parse_version_output(&lines(&["lando 3.0.0"])).is_err());
        assert!(parse_version_output(&lines(&["v3.0"])).is_err());
    }

    #[test]
    fn unparseable_suffix_is_kept_verbatim() {
        let version = parse_version_output(&lines(&["v3.0.0-20190401"])).unwrap();
        assert!(version.prerelease.is_none());
        assert_eq!(version.unrecognized_suffix.as_deref(), Some("20190401"));
        // Defaults still apply.
        assert_eq!(capabilities(&version), Capabilities::default());
    }

    #[test]
    fn capability_table_alpha() {
        let caps = caps_for("v3.0.0-alpha.4");
        assert!(!caps.needs_auth_token);
        assert_eq!(caps.list_format, ListFormat::Concatenated);
    }

    #[test]
    fn capability_table_beta_boundary_at_37() {
        let before = caps_for("v3.0.0-beta.36");
        assert!(!before.needs_auth_token);
        assert_eq!(before.list_format, ListFormat::Concatenated);

        let after = caps_for("v3.0.0-beta.37");
        assert!(!after.needs_auth_token);
        assert_eq!(after.list_format, ListFormat::Array);

        let late = caps_for("v3.0.0-beta.47");
        assert_eq!(late.list_format, ListFormat::Array);
    }

    #[test]
    fn capability_table_rc_boundaries() {
        let rc1 = caps_for("v3.0.0-rc.1");
        assert!(!rc1.needs_auth_token);
        assert_eq!(rc1.list_format, ListFormat::Array);

        let rc2 = caps_for("v3.0.0-rc.2");
        assert!(rc2.needs_auth_token);
        assert_eq!(rc2.list_format, ListFormat::LooseObject);

        let rc12 = caps_for("v3.0.0-rc.12");
        assert_eq!(rc12.list_format, ListFormat::LooseObject);

        let rc13 = caps_for("v3.0.0-rc.13");
        assert!(rc13.needs_auth_token);
        assert_eq!(rc13.list_format, ListFormat::Object);

        let rc23 = caps_for("v3.0.0-rc.23");
        assert_eq!(rc23.list_format, ListFormat::Object);
    }

    #[test]
    fn stable_and_later_versions_use_defaults() {
        assert_eq!(caps_for("v3.0.0"), Capabilities::default());
        assert_eq!(caps_for("v3.0.1"), Capabilities::default());
        assert_eq!(caps_for("v3.6.2"), Capabilities::default());
    }

    #[test]
    fn other_major_warns_but_keeps_defaults() {
        assert_eq!(caps_for("v4.0.0"), Capabilities::default());
        assert_eq!(caps_for("v2.9.9"), Capabilities::default());
    }

    #[test]
    fn unknown_channel_keeps_defaults() {
        assert_eq!(caps_for("v3.0.0-nightly.5"), Capabilities::default());
    }

    #[test]
    fn capabilities_are_deterministic() {
        for raw in [
            "v3.0.0-alpha.1",
            "v3.0.0-beta.40",
            "v3.0.0-rc.9",
            "v3.0.0",
            "v4.2.0",
        ] {
            let version = parse_version_output(&lines(&[raw])).unwrap();
            assert_eq!(capabilities(&version), capabilities(&version));
        }
    }
}
