//! Error types for the Claude Code boundary contract.
//!
//! Two distinct failure families live here, and keeping them separate is the
//! point of the module:
//!
//! - [`ClaudeCodeErrorCode`] classifies a failure *reported by the backend*
//!   inside a valid [`ClaudeCodeResult`](crate::ClaudeCodeResult). The
//!   enumeration is closed: a raw value carrying a code outside it does not
//!   deserialize, so an unrecognized code surfaces as a parse failure rather
//!   than a valid error result.
//! - [`ParseError`] / [`Error`] classify failures *of this crate's own
//!   operations* — raw data that never reached trustworthy shape, or a
//!   capability probe that could not run. Callers handle these as "could not
//!   validate", separately from a valid-but-failed result.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure classification carried inside a failed
/// [`ClaudeCodeResult`](crate::ClaudeCodeResult).
///
/// The wire form is SCREAMING_SNAKE_CASE (e.g. `"INVOCATION_FAILED"`).
/// There is deliberately no catch-all variant: the enumeration may grow in
/// future releases, but an existing code's meaning is never repurposed, and
/// a value this crate does not recognize fails to deserialize.
///
/// # Example
///
/// ```
/// use claude_code_contract::ClaudeCodeErrorCode;
///
/// let code: ClaudeCodeErrorCode = serde_json::from_str("\"LIMIT_EXCEEDED\"").unwrap();
/// assert_eq!(code, ClaudeCodeErrorCode::LimitExceeded);
///
/// // Unrecognized codes are rejected, not smuggled through.
/// assert!(serde_json::from_str::<ClaudeCodeErrorCode>("\"NOT_A_REAL_CODE\"").is_err());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaudeCodeErrorCode {
    /// The backend could not be reached or failed to start (spawn or
    /// transport failure before any task ran).
    InvocationFailed,

    /// The task started but failed mid-run, or the agent itself reported an
    /// error.
    ExecutionFailed,

    /// The request was rejected as malformed before execution began.
    InvalidRequest,

    /// A resource or time limit was exceeded.
    LimitExceeded,

    /// The backend produced an unparseable or out-of-contract response and
    /// the invocation collaborator mapped it here.
    ProtocolError,
}

impl ClaudeCodeErrorCode {
    /// The wire representation of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvocationFailed => "INVOCATION_FAILED",
            Self::ExecutionFailed => "EXECUTION_FAILED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::LimitExceeded => "LIMIT_EXCEEDED",
            Self::ProtocolError => "PROTOCOL_ERROR",
        }
    }
}

impl fmt::Display for ClaudeCodeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaudeCodeErrorCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INVOCATION_FAILED" => Ok(Self::InvocationFailed),
            "EXECUTION_FAILED" => Ok(Self::ExecutionFailed),
            "INVALID_REQUEST" => Ok(Self::InvalidRequest),
            "LIMIT_EXCEEDED" => Ok(Self::LimitExceeded),
            "PROTOCOL_ERROR" => Ok(Self::ProtocolError),
            other => Err(Error::UnknownErrorCode(other.to_string())),
        }
    }
}

/// Error type for parsing failures that preserves the raw JSON.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// The raw JSON value that failed to validate
    pub raw_json: Value,
    /// The underlying serde or invariant-check message
    pub error_message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse ClaudeCodeResult: {}", self.error_message)
    }
}

impl std::error::Error for ParseError {}

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization error: {0}")]
    Parse(#[from] ParseError),

    #[error("Unknown error code: {0}")]
    UnknownErrorCode(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_wire_roundtrip() {
        let codes = [
            (ClaudeCodeErrorCode::InvocationFailed, "\"INVOCATION_FAILED\""),
            (ClaudeCodeErrorCode::ExecutionFailed, "\"EXECUTION_FAILED\""),
            (ClaudeCodeErrorCode::InvalidRequest, "\"INVALID_REQUEST\""),
            (ClaudeCodeErrorCode::LimitExceeded, "\"LIMIT_EXCEEDED\""),
            (ClaudeCodeErrorCode::ProtocolError, "\"PROTOCOL_ERROR\""),
        ];

        for (code, wire) in codes {
            assert_eq!(serde_json::to_string(&code).unwrap(), wire);
            let parsed: ClaudeCodeErrorCode = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, code);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        let result = serde_json::from_str::<ClaudeCodeErrorCode>("\"NOT_A_REAL_CODE\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_str_matches_as_str() {
        for code in [
            ClaudeCodeErrorCode::InvocationFailed,
            ClaudeCodeErrorCode::ExecutionFailed,
            ClaudeCodeErrorCode::InvalidRequest,
            ClaudeCodeErrorCode::LimitExceeded,
            ClaudeCodeErrorCode::ProtocolError,
        ] {
            assert_eq!(code.as_str().parse::<ClaudeCodeErrorCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "nope".parse::<ClaudeCodeErrorCode>().unwrap_err();
        match err {
            Error::UnknownErrorCode(s) => assert_eq!(s, "nope"),
            other => panic!("Expected UnknownErrorCode, got {other:?}"),
        }
    }

    #[test]
    fn test_display_is_wire_form() {
        assert_eq!(
            ClaudeCodeErrorCode::ProtocolError.to_string(),
            "PROTOCOL_ERROR"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            raw_json: serde_json::json!({"success": "yes"}),
            error_message: "invalid type".to_string(),
        };
        assert!(err.to_string().contains("invalid type"));
    }
}
