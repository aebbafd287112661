//! Call context — explicit per-process identity for intercepted calls.
//!
//! One context is constructed at startup and threaded by reference
//! through every call site. There is no process-wide singleton: code
//! that needs the session id or user receives the context it was given.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity attached to every intercepted call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallContext {
    /// Random per-process session identifier.
    pub session_id: String,

    /// Resolved user identity (from configuration).
    pub user: String,
}

impl CallContext {
    /// Create a context with a fresh session id.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            user: user.into(),
        }
    }
}
