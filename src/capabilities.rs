//! Capability negotiation for a backend instance.
//!
//! [`ClaudeCodeCapabilities`] is a read-only snapshot of what one backend
//! instance supports. Hosts consult it before building a
//! [`ClaudeCodeConfig`](crate::ClaudeCodeConfig) and branch on flags instead
//! of comparing version strings, so a backend that lacks a feature degrades
//! the host gracefully rather than failing it.
//!
//! Two rules govern every flag:
//!
//! - Absence means "unsupported", never an error. A snapshot deserialized
//!   from a document with no flags at all is the all-false
//!   [`unsupported`](ClaudeCodeCapabilities::unsupported) snapshot.
//! - A snapshot is point-in-time, not a live query. If the backend is
//!   replaced or upgraded, the owning collaborator must re-query; nothing
//!   here refreshes itself.
//!
//! # Example
//!
//! ```
//! use claude_code_contract::ClaudeCodeCapabilities;
//!
//! let caps = ClaudeCodeCapabilities::from_version("2.1.0");
//! assert!(caps.streaming);
//! assert!(caps.structured_tool_arguments);
//!
//! let old = ClaudeCodeCapabilities::from_version("0.9.3");
//! assert!(!old.streaming);
//! ```

use crate::config::ClaudeCodeConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "detect")]
use crate::error::{Error, Result};
#[cfg(feature = "detect")]
use log::{debug, warn};

/// Backend version at which streaming partial output became available
const STREAMING_SINCE: &str = "1.0.0";

/// Backend version at which session resumption became available
const SESSION_RESUME_SINCE: &str = "1.0.45";

/// Backend version at which tool arguments became structured JSON
const STRUCTURED_TOOL_ARGUMENTS_SINCE: &str = "2.0.0";

/// Read-only snapshot of the features a backend instance supports.
///
/// Every boolean flag deserializes with `#[serde(default)]`, so a document
/// that omits a flag yields `false` - the safe interpretation. Numeric and
/// informational fields are `Option`s for the same reason: `None` means the
/// snapshot carries no claim, not that the backend enforces nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaudeCodeCapabilities {
    /// Can the backend stream partial output?
    #[serde(default)]
    pub streaming: bool,

    /// Does the backend emit structured (JSON) tool arguments?
    #[serde(default)]
    pub structured_tool_arguments: bool,

    /// Does the backend honor a tool allow-list?
    #[serde(default)]
    pub tool_allow_list: bool,

    /// Does the backend honor a per-invocation model override?
    #[serde(default)]
    pub model_selection: bool,

    /// Does the backend honor session correlation across invocations?
    #[serde(default)]
    pub session_resume: bool,

    /// Per-invocation ceiling on tool calls, when the backend declares one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tool_calls: Option<u32>,

    /// Backend version string this snapshot was derived from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// When this snapshot was taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_at: Option<DateTime<Utc>>,
}

impl ClaudeCodeCapabilities {
    /// The all-false snapshot: nothing is known, so nothing is assumed.
    pub fn unsupported() -> Self {
        Self::default()
    }

    /// Derive a snapshot from a backend version string (e.g. "1.0.89").
    ///
    /// An unparseable version yields [`unsupported`](Self::unsupported)
    /// flags; numeric ceilings like `max_tool_calls` are never derivable
    /// from a version and stay `None`.
    pub fn from_version(version: &str) -> Self {
        if !parses_as_version(version) {
            return ClaudeCodeCapabilities {
                version: Some(version.to_string()),
                ..Self::unsupported()
            };
        }

        ClaudeCodeCapabilities {
            streaming: version_at_least(version, STREAMING_SINCE),
            structured_tool_arguments: version_at_least(
                version,
                STRUCTURED_TOOL_ARGUMENTS_SINCE,
            ),
            tool_allow_list: true,
            model_selection: true,
            session_resume: version_at_least(version, SESSION_RESUME_SINCE),
            max_tool_calls: None,
            version: Some(version.to_string()),
            detected_at: None,
        }
    }

    /// Check whether every optional field the config populates is backed by
    /// a capability this snapshot declares.
    ///
    /// This is the programmatic form of "consult capabilities before config
    /// construction": a `false` answer tells the host to drop or rework the
    /// unsupported fields before invoking.
    ///
    /// # Example
    ///
    /// ```
    /// use claude_code_contract::{ClaudeCodeCapabilities, ClaudeCodeConfig};
    ///
    /// let caps = ClaudeCodeCapabilities::unsupported();
    /// let config = ClaudeCodeConfig::builder("task").model("opus").build();
    /// assert!(!caps.permits(&config));
    /// assert!(caps.permits(&ClaudeCodeConfig::new("task")));
    /// ```
    pub fn permits(&self, config: &ClaudeCodeConfig) -> bool {
        if !config.allowed_tools.is_empty() && !self.tool_allow_list {
            return false;
        }
        if config.model.is_some() && !self.model_selection {
            return false;
        }
        if config.session_id.is_some() && !self.session_resume {
            return false;
        }
        // prompt, project_root, and timeout_ms are part of the minimal
        // invocation contract every backend honors.
        true
    }

    /// Probe the installed backend binary and derive a snapshot.
    ///
    /// Runs `claude --version` and maps the reported version through
    /// [`from_version`](Self::from_version). A backend that cannot be
    /// spawned or exits nonzero yields an error - the host decides whether
    /// that means "proceed with [`unsupported`](Self::unsupported)" or
    /// "abort".
    #[cfg(feature = "detect")]
    pub fn detect() -> Result<Self> {
        Self::detect_command("claude")
    }

    /// Probe a specific backend binary instead of `claude` on `PATH`.
    #[cfg(feature = "detect")]
    pub fn detect_command(command: impl AsRef<std::ffi::OsStr>) -> Result<Self> {
        let output = std::process::Command::new(command)
            .arg("--version")
            .output()
            .map_err(Error::Io)?;

        if !output.status.success() {
            return Err(Error::BackendUnavailable(format!(
                "version probe exited with {}",
                output.status
            )));
        }

        Ok(Self::from_probe_output(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    /// Async variant of [`detect`](Self::detect) for tokio-based hosts.
    #[cfg(feature = "async-detect")]
    pub async fn detect_async() -> Result<Self> {
        Self::detect_command_async("claude").await
    }

    /// Async variant of [`detect_command`](Self::detect_command).
    #[cfg(feature = "async-detect")]
    pub async fn detect_command_async(command: impl AsRef<std::ffi::OsStr>) -> Result<Self> {
        let output = tokio::process::Command::new(command)
            .arg("--version")
            .output()
            .await
            .map_err(Error::Io)?;

        if !output.status.success() {
            return Err(Error::BackendUnavailable(format!(
                "version probe exited with {}",
                output.status
            )));
        }

        Ok(Self::from_probe_output(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    /// Map `--version` output (format: "1.0.89 (Claude Code)") to a snapshot
    #[cfg(feature = "detect")]
    fn from_probe_output(probe: &str) -> Self {
        let version_line = probe.lines().next().unwrap_or("");

        let mut caps = match version_line.split_whitespace().next() {
            Some(version) if parses_as_version(version) => {
                debug!("Backend reported version {}", version);
                Self::from_version(version)
            }
            _ => {
                warn!(
                    "Could not parse backend version from output: '{}'",
                    version_line
                );
                Self::unsupported()
            }
        };

        caps.detected_at = Some(Utc::now());
        caps
    }
}

/// Whether the string carries at least one numeric version segment
fn parses_as_version(version: &str) -> bool {
    version.split('.').any(|s| s.parse::<u32>().is_ok())
}

/// Compare two version strings (e.g. "1.0.89" vs "1.0.45")
fn version_at_least(version: &str, floor: &str) -> bool {
    let v_parts: Vec<u32> = version.split('.').filter_map(|s| s.parse().ok()).collect();
    let f_parts: Vec<u32> = floor.split('.').filter_map(|s| s.parse().ok()).collect();

    if v_parts.is_empty() {
        return false;
    }

    use std::cmp::Ordering;

    // Missing trailing segments count as zero, so "1.1" >= "1.1.0".
    for i in 0..v_parts.len().max(f_parts.len()) {
        let v = v_parts.get(i).copied().unwrap_or(0);
        let f = f_parts.get(i).copied().unwrap_or(0);
        match v.cmp(&f) {
            Ordering::Greater => return true,
            Ordering::Less => return false,
            Ordering::Equal => continue,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_comparison() {
        assert!(version_at_least("1.0.90", "1.0.89"));
        assert!(!version_at_least("1.0.89", "1.0.90"));
        assert!(version_at_least("1.0.89", "1.0.89"));

        // Different segment counts
        assert!(version_at_least("1.1", "1.0.89"));
        assert!(!version_at_least("1.0", "1.0.89"));
        assert!(version_at_least("1.0.89.1", "1.0.89"));
        assert!(version_at_least("1.1", "1.1.0"));

        // Major version differences
        assert!(version_at_least("2.0.0", "1.99.99"));
        assert!(!version_at_least("0.9.99", "1.0.0"));
    }

    #[test]
    fn test_unsupported_is_all_false() {
        let caps = ClaudeCodeCapabilities::unsupported();
        assert!(!caps.streaming);
        assert!(!caps.structured_tool_arguments);
        assert!(!caps.tool_allow_list);
        assert!(!caps.model_selection);
        assert!(!caps.session_resume);
        assert!(caps.max_tool_calls.is_none());
        assert_eq!(caps, ClaudeCodeCapabilities::default());
    }

    #[test]
    fn test_absent_flags_deserialize_as_unsupported() {
        let caps: ClaudeCodeCapabilities = serde_json::from_str("{}").unwrap();
        assert_eq!(caps, ClaudeCodeCapabilities::unsupported());

        // Partial documents leave the rest unsupported.
        let caps: ClaudeCodeCapabilities =
            serde_json::from_str(r#"{"streaming": true}"#).unwrap();
        assert!(caps.streaming);
        assert!(!caps.structured_tool_arguments);
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let caps: ClaudeCodeCapabilities =
            serde_json::from_str(r#"{"streaming": true, "futureFlag": true}"#).unwrap();
        assert!(caps.streaming);
    }

    #[test]
    fn test_from_version_thresholds() {
        let old = ClaudeCodeCapabilities::from_version("0.9.3");
        assert!(!old.streaming);
        assert!(!old.session_resume);
        assert!(!old.structured_tool_arguments);
        assert!(old.tool_allow_list);

        let mid = ClaudeCodeCapabilities::from_version("1.0.89");
        assert!(mid.streaming);
        assert!(mid.session_resume);
        assert!(!mid.structured_tool_arguments);

        let new = ClaudeCodeCapabilities::from_version("2.1.47");
        assert!(new.streaming);
        assert!(new.session_resume);
        assert!(new.structured_tool_arguments);
    }

    #[test]
    fn test_from_version_records_version() {
        let caps = ClaudeCodeCapabilities::from_version("1.0.89");
        assert_eq!(caps.version.as_deref(), Some("1.0.89"));
        assert!(caps.max_tool_calls.is_none());
    }

    #[test]
    fn test_unparseable_version_is_unsupported() {
        let caps = ClaudeCodeCapabilities::from_version("development");
        assert!(!caps.streaming);
        assert!(!caps.tool_allow_list);
        assert_eq!(caps.version.as_deref(), Some("development"));
    }

    #[test]
    fn test_permits_minimal_config_always() {
        let config = ClaudeCodeConfig::new("task");
        assert!(ClaudeCodeCapabilities::unsupported().permits(&config));
        assert!(ClaudeCodeCapabilities::from_version("2.1.47").permits(&config));
    }

    #[test]
    fn test_permits_checks_populated_optionals() {
        let caps = ClaudeCodeCapabilities::from_version("0.9.3");

        let with_tools = ClaudeCodeConfig::builder("task")
            .allowed_tools(["Read"])
            .build();
        assert!(caps.permits(&with_tools));

        let with_session = ClaudeCodeConfig::builder("task")
            .session_id(uuid::Uuid::new_v4())
            .build();
        assert!(!caps.permits(&with_session));

        let newer = ClaudeCodeCapabilities::from_version("1.0.89");
        assert!(newer.permits(&with_session));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let caps = ClaudeCodeCapabilities::from_version("2.1.47");
        let json = serde_json::to_string(&caps).unwrap();
        assert!(json.contains("\"structuredToolArguments\":true"));

        let parsed: ClaudeCodeCapabilities = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, caps);
    }

    #[cfg(feature = "detect")]
    #[test]
    fn test_probe_output_parsing() {
        let caps = ClaudeCodeCapabilities::from_probe_output("1.0.89 (Claude Code)\n");
        assert_eq!(caps.version.as_deref(), Some("1.0.89"));
        assert!(caps.streaming);
        assert!(caps.detected_at.is_some());
    }

    #[cfg(feature = "detect")]
    #[test]
    fn test_probe_output_garbage_is_unsupported() {
        let caps = ClaudeCodeCapabilities::from_probe_output("command not found\n");
        assert!(!caps.streaming);
        assert!(caps.version.is_none());
        assert!(caps.detected_at.is_some());
    }
}
