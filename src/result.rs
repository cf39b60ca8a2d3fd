//! Normalized invocation outcome and the boundary validator.
//!
//! This module defines the shapes an invocation collaborator must produce:
//!
//! - [`ClaudeCodeResult`] - The outcome of one backend invocation
//! - [`ClaudeCodeToolCall`] - One tool invocation the agent requested
//! - [`is_claude_code_result`] - The predicate gating untrusted raw values
//!
//! Backend responses cross a process boundary, so nothing about their shape
//! is guaranteed at compile time. Every raw value must pass through
//! [`is_claude_code_result`] (or the fallible [`ClaudeCodeResult::from_value`])
//! before any field access; downstream code may treat a validated result as
//! trustworthy.
//!
//! # Example
//!
//! ```
//! use claude_code_contract::{is_claude_code_result, ClaudeCodeResult};
//! use serde_json::json;
//!
//! let raw = json!({ "success": true, "output": "done", "toolCalls": [] });
//! assert!(is_claude_code_result(&raw));
//!
//! let result = ClaudeCodeResult::from_value(raw).unwrap();
//! assert_eq!(result.output_text(), Some("done"));
//! ```

use crate::error::{ClaudeCodeErrorCode, ParseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool invocation the agent requested during execution.
///
/// A tool call is a description, not an action: the host owns the decision
/// to execute, reject, or simulate it. The `arguments` payload is opaque at
/// this layer and validated per-tool by whatever executes the call, but the
/// container shape (id, name, arguments) is part of the contract and must
/// always be present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaudeCodeToolCall {
    /// Identifier correlating this call to a step in the result (e.g. "toolu_123")
    pub id: String,

    /// Name of the tool the agent wants to use (e.g. "Bash", "Write", "Read")
    pub name: String,

    /// Opaque argument payload, validated per-tool downstream
    pub arguments: Value,
}

/// The normalized outcome of one backend invocation.
///
/// Produced by validation from an untrusted raw value; immutable once
/// validated. The `success` flag and `error_code` are coupled by contract:
/// a successful result never carries a code, a failed result carries exactly
/// one code from the closed [`ClaudeCodeErrorCode`] enumeration. Values
/// violating that coupling do not validate.
///
/// Tool calls are ordered: the sequence reflects the order the agent emitted
/// them, and consumers replaying tool calls depend on it surviving end to end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaudeCodeResult {
    /// Whether the invocation completed successfully
    pub success: bool,

    /// Primary output, textual or structured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,

    /// Tool invocations requested during execution, in emission order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ClaudeCodeToolCall>,

    /// Failure classification; present iff `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ClaudeCodeErrorCode>,

    /// Human-readable diagnostic detail accompanying a failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,

    /// Session this invocation belonged to, when the backend reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Wall-clock duration of the invocation as measured by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ClaudeCodeResult {
    /// Build a successful result with the given output.
    pub fn succeeded(output: impl Into<Value>) -> Self {
        ClaudeCodeResult {
            success: true,
            output: Some(output.into()),
            tool_calls: Vec::new(),
            error_code: None,
            error_detail: None,
            session_id: None,
            duration_ms: None,
        }
    }

    /// Build a failed result carrying exactly one error code.
    ///
    /// This is the constructor an invocation collaborator uses to map a
    /// transport or execution failure into the taxonomy; raw transport
    /// errors must never reach the validated-result boundary unclassified.
    pub fn failed(code: ClaudeCodeErrorCode, detail: impl Into<String>) -> Self {
        ClaudeCodeResult {
            success: false,
            output: None,
            tool_calls: Vec::new(),
            error_code: Some(code),
            error_detail: Some(detail.into()),
            session_id: None,
            duration_ms: None,
        }
    }

    /// Whether this result represents a failure.
    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// The output as text, if it is a string.
    ///
    /// # Example
    /// ```
    /// use claude_code_contract::ClaudeCodeResult;
    ///
    /// let result = ClaudeCodeResult::succeeded("done");
    /// assert_eq!(result.output_text(), Some("done"));
    /// ```
    pub fn output_text(&self) -> Option<&str> {
        self.output.as_ref().and_then(Value::as_str)
    }

    /// Get a specific tool call by tool name.
    ///
    /// Returns the first call with the given name, or `None`.
    pub fn tool_call(&self, tool_name: &str) -> Option<&ClaudeCodeToolCall> {
        self.tool_calls.iter().find(|tc| tc.name == tool_name)
    }

    /// Validate an untrusted raw value against the result contract.
    ///
    /// This is the fallible-parse form of [`is_claude_code_result`]: on
    /// success the returned value is safe to pass deeper into the host, on
    /// failure the [`ParseError`] preserves the raw JSON for diagnostics.
    ///
    /// # Example
    ///
    /// ```
    /// use claude_code_contract::ClaudeCodeResult;
    /// use serde_json::json;
    ///
    /// // A failed result must carry a recognized code.
    /// let raw = json!({ "success": false, "errorCode": "EXECUTION_FAILED" });
    /// let result = ClaudeCodeResult::from_value(raw).unwrap();
    /// assert!(result.is_failure());
    ///
    /// // Contradictory values are rejected.
    /// let raw = json!({ "success": true, "errorCode": "EXECUTION_FAILED" });
    /// assert!(ClaudeCodeResult::from_value(raw).is_err());
    /// ```
    pub fn from_value(value: Value) -> Result<ClaudeCodeResult, ParseError> {
        let result: ClaudeCodeResult =
            serde_json::from_value(value.clone()).map_err(|e| ParseError {
                raw_json: value.clone(),
                error_message: e.to_string(),
            })?;

        if result.success && result.error_code.is_some() {
            return Err(ParseError {
                raw_json: value,
                error_message: "successful result must not carry an error code".to_string(),
            });
        }
        if !result.success && result.error_code.is_none() {
            return Err(ParseError {
                raw_json: value,
                error_message: "failed result must carry an error code".to_string(),
            });
        }

        Ok(result)
    }

    /// Parse a JSON string, returning [`ParseError`] with the raw JSON if it
    /// does not match the contract.
    pub fn from_json(s: &str) -> Result<ClaudeCodeResult, ParseError> {
        let value: Value = serde_json::from_str(s).map_err(|e| ParseError {
            raw_json: Value::String(s.to_string()),
            error_message: format!("Invalid JSON: {}", e),
        })?;

        Self::from_value(value)
    }

    /// Parse a JSON string, handling potential ANSI escape codes and other
    /// prefixes picked up at the transport boundary.
    ///
    /// This will:
    /// 1. First try to parse as-is
    /// 2. If that fails, trim until it finds a '{' and try again
    pub fn from_json_tolerant(s: &str) -> Result<ClaudeCodeResult, ParseError> {
        match Self::from_json(s) {
            Ok(result) => Ok(result),
            Err(first_error) => {
                if let Some(json_start) = s.find('{') {
                    match Self::from_json(&s[json_start..]) {
                        Ok(result) => Ok(result),
                        // Return the original error if both attempts fail
                        Err(_) => Err(first_error),
                    }
                } else {
                    Err(first_error)
                }
            }
        }
    }
}

/// Check whether an untrusted value structurally matches [`ClaudeCodeResult`].
///
/// Returns `true` if and only if the value carries a boolean `success`
/// discriminant, a recognized `errorCode` exactly when `success` is false,
/// and well-formed tool-call entries when `toolCalls` is present. Every
/// other input - `null`, primitives, arrays, malformed objects - yields
/// `false`. The check is pure and never panics, so it is safe to apply to
/// anything a transport hands over.
///
/// # Example
///
/// ```
/// use claude_code_contract::is_claude_code_result;
/// use serde_json::json;
///
/// assert!(is_claude_code_result(&json!({
///     "success": false,
///     "errorCode": "INVOCATION_FAILED",
///     "output": ""
/// })));
///
/// assert!(!is_claude_code_result(&json!("a string")));
/// assert!(!is_claude_code_result(&json!({ "success": false })));
/// ```
pub fn is_claude_code_result(value: &Value) -> bool {
    ClaudeCodeResult::from_value(value.clone()).is_ok()
}
