//! Configuration for one backend invocation.
//!
//! [`ClaudeCodeConfig`] is an immutable value the host constructs before each
//! invocation and hands to the invocation collaborator. Constructing one
//! never fails; whether a given combination of fields is honored is decided
//! at invocation time by the backend, and which optional fields are worth
//! setting at all is decided beforehand against a
//! [`ClaudeCodeCapabilities`](crate::ClaudeCodeCapabilities) snapshot.
//!
//! # Example
//!
//! ```
//! use claude_code_contract::ClaudeCodeConfig;
//!
//! let config = ClaudeCodeConfig::builder("Fix the failing test in src/parser.rs")
//!     .project_root("/home/user/repo")
//!     .timeout_ms(120_000)
//!     .allowed_tools(["Read", "Edit", "Bash"])
//!     .model("sonnet")
//!     .build();
//!
//! assert_eq!(config.model.as_deref(), Some("sonnet"));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;
use uuid::Uuid;

/// Serialize an optional UUID as a string
fn serialize_optional_uuid<S>(uuid: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match uuid {
        Some(id) => serializer.serialize_str(&id.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Deserialize an optional UUID from a string
fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt_str: Option<String> = Option::deserialize(deserializer)?;
    match opt_str {
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Immutable description of one invocation request.
///
/// Only `prompt` is required for a minimal invocation; every optional field
/// absent means "use the backend default", not "disable". In particular an
/// absent `timeout_ms` still leaves the backend's own timeout in force, and
/// an empty `allowed_tools` imposes no restriction beyond backend defaults.
///
/// Configs are treated as immutable snapshots: concurrent invocations using
/// different configs never interfere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaudeCodeConfig {
    /// The task for the agent to execute. Required, non-empty by contract.
    pub prompt: String,

    /// Root directory scoping the agent's file-system access
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// Per-invocation time budget in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Allow-list restricting which tools the agent may invoke
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_tools: Vec<String>,

    /// Model or variant selector (e.g. "sonnet", "opus")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Session identifier correlating invocations in one conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(
        serialize_with = "serialize_optional_uuid",
        deserialize_with = "deserialize_optional_uuid"
    )]
    pub session_id: Option<Uuid>,
}

impl ClaudeCodeConfig {
    /// Create a minimal config: just the prompt, backend defaults for the rest.
    pub fn new(prompt: impl Into<String>) -> Self {
        ClaudeCodeConfig {
            prompt: prompt.into(),
            project_root: None,
            timeout_ms: None,
            allowed_tools: Vec::new(),
            model: None,
            session_id: None,
        }
    }

    /// Start a builder for a config with optional fields.
    pub fn builder(prompt: impl Into<String>) -> ClaudeCodeConfigBuilder {
        ClaudeCodeConfigBuilder::new(prompt)
    }
}

/// Builder for [`ClaudeCodeConfig`].
///
/// Construction never fails; `build()` returns the config directly.
#[derive(Debug, Clone)]
pub struct ClaudeCodeConfigBuilder {
    prompt: String,
    project_root: Option<PathBuf>,
    timeout_ms: Option<u64>,
    allowed_tools: Vec<String>,
    model: Option<String>,
    session_id: Option<Uuid>,
}

impl ClaudeCodeConfigBuilder {
    /// Create a new builder for the given prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        ClaudeCodeConfigBuilder {
            prompt: prompt.into(),
            project_root: None,
            timeout_ms: None,
            allowed_tools: Vec::new(),
            model: None,
            session_id: None,
        }
    }

    /// Scope the agent's file-system access to this root
    pub fn project_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.project_root = Some(root.into());
        self
    }

    /// Set the per-invocation time budget in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Add allowed tools
    pub fn allowed_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tools
            .extend(tools.into_iter().map(|s| s.into()));
        self
    }

    /// Set the model to use
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Correlate this invocation with a session
    pub fn session_id(mut self, id: Uuid) -> Self {
        self.session_id = Some(id);
        self
    }

    /// Build the config
    pub fn build(self) -> ClaudeCodeConfig {
        ClaudeCodeConfig {
            prompt: self.prompt,
            project_root: self.project_root,
            timeout_ms: self.timeout_ms,
            allowed_tools: self.allowed_tools,
            model: self.model,
            session_id: self.session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = ClaudeCodeConfig::new("What is 2 + 2?");
        assert_eq!(config.prompt, "What is 2 + 2?");
        assert!(config.project_root.is_none());
        assert!(config.timeout_ms.is_none());
        assert!(config.allowed_tools.is_empty());
        assert!(config.model.is_none());
        assert!(config.session_id.is_none());
    }

    #[test]
    fn test_builder_matches_direct_construction() {
        let built = ClaudeCodeConfig::builder("task")
            .project_root("/repo")
            .timeout_ms(60_000)
            .allowed_tools(["Read", "Bash"])
            .model("sonnet")
            .build();

        let direct = ClaudeCodeConfig {
            prompt: "task".to_string(),
            project_root: Some(PathBuf::from("/repo")),
            timeout_ms: Some(60_000),
            allowed_tools: vec!["Read".to_string(), "Bash".to_string()],
            model: Some("sonnet".to_string()),
            session_id: None,
        };

        assert_eq!(built, direct);
    }

    #[test]
    fn test_allowed_tools_accumulate() {
        let config = ClaudeCodeConfig::builder("task")
            .allowed_tools(["Read"])
            .allowed_tools(["Write", "Edit"])
            .build();
        assert_eq!(config.allowed_tools, ["Read", "Write", "Edit"]);
    }

    #[test]
    fn test_serialize_camel_case() {
        let config = ClaudeCodeConfig::builder("task")
            .project_root("/repo")
            .timeout_ms(5_000)
            .build();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"projectRoot\":\"/repo\""));
        assert!(json.contains("\"timeoutMs\":5000"));
    }

    #[test]
    fn test_absent_optionals_not_serialized() {
        let json = serde_json::to_string(&ClaudeCodeConfig::new("task")).unwrap();
        assert_eq!(json, r#"{"prompt":"task"}"#);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: ClaudeCodeConfig = serde_json::from_str(r#"{"prompt":"task"}"#).unwrap();
        assert_eq!(config, ClaudeCodeConfig::new("task"));
    }

    #[test]
    fn test_session_id_roundtrips_as_string() {
        let session_id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let config = ClaudeCodeConfig::builder("task").session_id(session_id).build();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"sessionId\":\"550e8400-e29b-41d4-a716-446655440000\""));

        let parsed: ClaudeCodeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.session_id, Some(session_id));
    }

    #[test]
    fn test_invalid_session_id_rejected() {
        let result =
            serde_json::from_str::<ClaudeCodeConfig>(r#"{"prompt":"task","sessionId":"nope"}"#);
        assert!(result.is_err());
    }
}
