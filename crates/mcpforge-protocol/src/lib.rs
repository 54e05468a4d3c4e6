//! Wire-level vocabulary for mcpforge.
//!
//! This crate defines the parts of the MCP streamable HTTP surface that the
//! session core must reproduce byte for byte:
//!
//! - **Errors** ([`McpError`], [`ErrorEnvelope`]) — the JSON-RPC error
//!   taxonomy and the envelope it travels in.
//! - **Request inspection** ([`is_initialize_request`]) — how a
//!   session-less POST is classified.
//! - **Header names** ([`MCP_SESSION_ID_HEADER`]) — the canonical session
//!   header.
//!
//! It knows nothing about transports, sessions, or HTTP routing — only the
//! shapes that cross the wire.

mod error;
mod request;

pub use error::{ErrorBody, ErrorEnvelope, McpError};
pub use request::is_initialize_request;

/// Canonical name of the session id header. HTTP header lookup is
/// case-insensitive, so this single lowercase form covers all spellings.
pub const MCP_SESSION_ID_HEADER: &str = "mcp-session-id";

/// Default endpoint path the MCP routes are registered under.
pub const MCP_DEFAULT_ENDPOINT: &str = "/mcp";
