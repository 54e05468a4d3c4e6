//! Unified error type for the mcpforge stack.

use mcpforge_auth::AuthError;
use mcpforge_protocol::McpError;
use mcpforge_session::SessionError;
use mcpforge_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `mcpforge` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum McpforgeError {
    /// A transport-level error (connect, forward, close).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (request shape, session header).
    #[error(transparent)]
    Protocol(#[from] McpError),

    /// A session-level error (creation failure).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An authorization error (bearer token, scopes).
    #[error(transparent)]
    Auth(#[from] AuthError),
}
