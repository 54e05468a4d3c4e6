//! Session lifecycle events.
//!
//! Observers registered with [`SessionManager::on_event`] receive these
//! synchronously, in registration order, strictly after the table mutation
//! they describe. Delivery never happens while the table lock is held, so
//! an observer may call back into the manager.
//!
//! [`SessionManager::on_event`]: crate::SessionManager::on_event

use mcpforge_transport::{SessionId, TransportError};

/// A lifecycle transition in the session table.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A session completed its initialize handshake and is now routable.
    Created { session_id: SessionId },

    /// A session was removed from the table (explicit DELETE,
    /// transport-originated closure, or shutdown).
    Destroyed { session_id: SessionId },

    /// The session's transport reported an error. The session stays
    /// registered; removal only happens through a close.
    TransportError {
        session_id: SessionId,
        error: TransportError,
    },
}

impl SessionEvent {
    /// The session this event concerns.
    pub fn session_id(&self) -> &SessionId {
        match self {
            SessionEvent::Created { session_id }
            | SessionEvent::Destroyed { session_id }
            | SessionEvent::TransportError { session_id, .. } => session_id,
        }
    }
}
