//! # mcpforge
//!
//! Session-aware streamable HTTP layer for MCP servers.
//!
//! mcpforge sits between your HTTP stack and an MCP protocol engine. It
//! serves POST, GET and DELETE on a single endpoint, tracks live sessions
//! by their `mcp-session-id` header, and optionally fronts everything with
//! an OAuth bearer gate. The protocol engine stays pluggable behind the
//! [`McpEngine`] trait.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mcpforge::prelude::*;
//!
//! # async fn serve(engine: Arc<dyn McpEngine>) {
//! let server = McpServer::builder().build(engine);
//! let app = server.router();
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
//!     .await
//!     .unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

mod error;
mod handlers;
mod response;
mod server;

pub use error::McpforgeError;
pub use server::{McpServer, McpServerBuilder, ServerStats};

pub use mcpforge_auth::{
    AuthContext, AuthError, BearerAuthGate, BearerAuthOptions, OAuthErrorBody,
    TokenVerifier, www_authenticate,
};
pub use mcpforge_protocol::{
    ErrorBody, ErrorEnvelope, MCP_DEFAULT_ENDPOINT, MCP_SESSION_ID_HEADER,
    McpError, is_initialize_request,
};
pub use mcpforge_session::{
    SessionError, SessionEvent, SessionManager, SessionValidator,
    SessionVerdict,
};
pub use mcpforge_transport::{
    McpEngine, ResponseBody, SessionId, StreamableTransport, TransportError,
    TransportHooks, TransportRequest, TransportResponse,
};

/// The commonly-needed surface in one import.
pub mod prelude {
    pub use crate::{
        AuthContext, AuthError, BearerAuthOptions, McpEngine, McpServer,
        McpforgeError, SessionEvent, SessionId, StreamableTransport,
        TokenVerifier, TransportError, TransportHooks, TransportRequest,
        TransportResponse,
    };
}
