//! Typed boundary contract for hosts embedding the Claude Code agent backend
//!
//! This crate defines the contract between a host orchestration system and an
//! externally-invoked Claude Code backend: the shape of configuration one
//! invocation accepts, the capability flags a backend instance advertises,
//! the normalized result (including requested tool calls) an invocation
//! produces, the closed failure taxonomy, and the runtime validator that
//! gates untrusted backend output before the host trusts it.
//!
//! The actual invocation is not here. Spawning the backend, building the
//! prompt, and reassembling streamed output belong to external collaborators;
//! this crate is the schema they agree on, plus the one piece of executable
//! logic that matters at a process boundary - deciding whether a raw value is
//! a well-formed result at all.
//!
//! # Quick Start
//!
//! ```bash
//! cargo add claude-code-contract
//! ```
//!
//! ```
//! use claude_code_contract::{
//!     is_claude_code_result, ClaudeCodeCapabilities, ClaudeCodeConfig, ClaudeCodeResult,
//! };
//! use serde_json::json;
//!
//! // 1. Consult capabilities to decide which optional fields are safe to set.
//! let caps = ClaudeCodeCapabilities::from_version("2.1.47");
//!
//! // 2. Build the invocation config.
//! let mut builder = ClaudeCodeConfig::builder("Fix the failing test");
//! if caps.model_selection {
//!     builder = builder.model("sonnet");
//! }
//! let config = builder.build();
//! assert!(caps.permits(&config));
//!
//! // 3. The invocation collaborator runs the backend and hands back raw data...
//! let raw = json!({ "success": true, "output": "done", "toolCalls": [] });
//!
//! // 4. ...which must pass the boundary validator before anything trusts it.
//! assert!(is_claude_code_result(&raw));
//! let result = ClaudeCodeResult::from_value(raw).unwrap();
//! assert_eq!(result.output_text(), Some("done"));
//! ```
//!
//! # Architecture
//!
//! - [`config`] - [`ClaudeCodeConfig`] and its builder: one invocation request
//! - [`capabilities`] - [`ClaudeCodeCapabilities`]: feature-flag snapshots and
//!   version-based detection
//! - [`result`] - [`ClaudeCodeResult`], [`ClaudeCodeToolCall`], and the
//!   boundary validator [`is_claude_code_result`]
//! - [`error`] - the closed [`ClaudeCodeErrorCode`] taxonomy, [`ParseError`],
//!   and crate error types
//!
//! # Validation Contract
//!
//! Backend responses cross a process boundary where no static type system
//! guarantees shape. Every consumer must validate raw values - via the
//! boolean predicate [`is_claude_code_result`] or the fallible
//! [`ClaudeCodeResult::from_value`] - before field access. Validation rejects
//! the two contradictions the contract forbids (a successful result carrying
//! an error code, a failed result carrying none) and any error code outside
//! the closed enumeration. "Could not validate" is a distinct condition from
//! a valid-but-failed result and must be handled separately.

pub mod capabilities;
pub mod config;
pub mod error;
pub mod result;

pub use capabilities::ClaudeCodeCapabilities;
pub use config::{ClaudeCodeConfig, ClaudeCodeConfigBuilder};
pub use error::{ClaudeCodeErrorCode, Error, ParseError, Result};
pub use result::{is_claude_code_result, ClaudeCodeResult, ClaudeCodeToolCall};
