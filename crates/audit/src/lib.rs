//! Durable audit persistence for ironsieve.
//!
//! The store is append-only: the runtime path inserts one row per
//! intercepted call and never updates or deletes. Reads serve the
//! dashboard-style aggregations (recent activity, DLP summary, tool
//! stats, sessions).

pub mod logger;
pub mod store;

pub use logger::AuditLogger;
pub use store::{AuditStore, PatternSummary, SessionSummary, ToolStat};
