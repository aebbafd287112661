//! # ironsieve Core
//!
//! Domain types, traits, and error definitions for the ironsieve tool-call
//! gateway. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The gateway's moving parts (scanner, policy engine, audit store,
//! interceptor) live in their own crates and depend inward on the types
//! here. Nothing in this crate does I/O.

pub mod context;
pub mod decision;
pub mod error;
pub mod event;
pub mod finding;
pub mod record;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use context::CallContext;
pub use decision::{DlpAction, PolicyAction, PolicyDecision};
pub use error::{AuditError, DlpError, Error, PolicyError, Result, ToolError};
pub use event::{AiService, BrowserEvent, EventAction, detect_ai_service};
pub use finding::{Finding, Severity};
pub use record::AuditEntry;
pub use tool::{Tool, ToolDefinition, ToolRegistry, ToolResult};
