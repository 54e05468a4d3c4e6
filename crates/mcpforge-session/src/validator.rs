//! Session header validation.
//!
//! Every verb runs the same classification; only the interpretation of a
//! missing header differs. POST may create a session when the header is
//! absent, GET and DELETE may not. That policy is threaded in by the caller
//! as `require_session` rather than hard-coded here.

use std::fmt;
use std::sync::Arc;

use http::HeaderMap;
use mcpforge_protocol::MCP_SESSION_ID_HEADER;
use mcpforge_transport::{SessionId, StreamableTransport};

use crate::SessionManager;

/// The validator's classification of a request's session header.
pub enum SessionVerdict {
    /// Header present and the session is live.
    Valid {
        session_id: SessionId,
        transport: Arc<dyn StreamableTransport>,
    },

    /// Header absent, and the caller said that's acceptable — the request
    /// must create its own session.
    NoSession,

    /// Header absent but required.
    MissingHeader,

    /// Header present but no live session matches. Carries the id for
    /// error reporting.
    Unknown { session_id: SessionId },
}

impl fmt::Debug for SessionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionVerdict::Valid { session_id, .. } => {
                f.debug_struct("Valid").field("session_id", session_id).finish()
            }
            SessionVerdict::NoSession => f.write_str("NoSession"),
            SessionVerdict::MissingHeader => f.write_str("MissingHeader"),
            SessionVerdict::Unknown { session_id } => f
                .debug_struct("Unknown")
                .field("session_id", session_id)
                .finish(),
        }
    }
}

/// Derives a [`SessionVerdict`] from request headers against the session
/// table. Stateless given its inputs.
#[derive(Clone)]
pub struct SessionValidator {
    sessions: SessionManager,
}

impl SessionValidator {
    pub fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    /// Classifies the request's `mcp-session-id` header.
    ///
    /// `HeaderMap` lookups are case-insensitive, so any spelling of the
    /// header matches. A header whose value is not valid UTF-8 cannot name
    /// any session and is treated as absent.
    pub fn validate(
        &self,
        headers: &HeaderMap,
        require_session: bool,
    ) -> SessionVerdict {
        let raw = headers
            .get(MCP_SESSION_ID_HEADER)
            .and_then(|value| value.to_str().ok());

        let Some(raw) = raw else {
            return if require_session {
                SessionVerdict::MissingHeader
            } else {
                SessionVerdict::NoSession
            };
        };

        let session_id = SessionId::new(raw);
        match self.sessions.get_session(&session_id) {
            Some(transport) => SessionVerdict::Valid {
                session_id,
                transport,
            },
            None => SessionVerdict::Unknown { session_id },
        }
    }
}
