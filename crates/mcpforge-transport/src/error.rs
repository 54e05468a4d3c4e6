/// Errors that can occur in the transport layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Establishing the connection to the protocol engine failed.
    #[error("connection to protocol engine failed: {0}")]
    ConnectionFailed(String),

    /// The transport rejected or failed to handle a forwarded request.
    #[error("request handling failed: {0}")]
    RequestFailed(String),

    /// The transport (or the engine behind it) was already closed.
    #[error("transport closed")]
    Closed,
}
