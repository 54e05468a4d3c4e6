//! Error types for the session layer.

use mcpforge_transport::TransportError;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The protocol engine refused the connection; no session was created
    /// and no table entry exists.
    #[error("failed to establish session transport: {0}")]
    ConnectionFailed(#[source] TransportError),
}
