//! The protocol-layer error taxonomy.
//!
//! These are the three rejections the session core itself produces before a
//! request ever reaches a transport. Each maps to a fixed JSON-RPC error
//! code and is always delivered with HTTP status 400 in the envelope shape
//! clients parse:
//!
//! ```json
//! { "jsonrpc": "2.0", "error": { "code": -32003, "message": "..." }, "id": null }
//! ```

use serde::{Deserialize, Serialize};

/// Errors the session core reports through the JSON-RPC envelope.
///
/// `InvalidSessionHeader` and `SessionNotFound` are deliberately distinct so
/// a client can tell "you forgot the header" apart from "that session no
/// longer exists".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum McpError {
    /// A session-less POST whose body is not an initialize request.
    #[error("MCP error -32600: Invalid request")]
    InvalidRequest,

    /// A required `mcp-session-id` header is absent.
    #[error("MCP error -32001: Invalid session header")]
    InvalidSessionHeader,

    /// The session id in the header matches no live session.
    #[error("MCP error -32003: Session not found")]
    SessionNotFound,
}

impl McpError {
    /// The JSON-RPC error code for this variant.
    pub fn code(&self) -> i32 {
        match self {
            McpError::InvalidRequest => -32600,
            McpError::InvalidSessionHeader => -32001,
            McpError::SessionNotFound => -32003,
        }
    }

    /// Builds the full JSON-RPC error envelope for this error.
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            jsonrpc: "2.0".to_string(),
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
            id: None,
        }
    }
}

/// The JSON-RPC 2.0 error envelope.
///
/// `id` is always `null` for these errors: the core rejects the request
/// before it can associate it with any JSON-RPC call id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub jsonrpc: String,
    pub error: ErrorBody,
    pub id: Option<serde_json::Value>,
}

/// The `error` member of the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: i32,
    pub message: String,
}
