//! HTTP request dispatch for the streamable MCP endpoint.
//!
//! One handler per verb, all serving the same path. Each one classifies the
//! `mcp-session-id` header first and only then touches a transport, so
//! rejected requests never reach the protocol engine. Policy per verb:
//!
//! - POST may arrive without a session, but only an initialize request is
//!   allowed to create one
//! - GET opens the standalone event stream of an existing session
//! - DELETE terminates an existing session, destroying it even when the
//!   transport's answer is an error
//!
//! Transport I/O runs after every table lock is released.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use http::{HeaderMap, Method};
use mcpforge_protocol::{McpError, is_initialize_request};
use mcpforge_session::SessionVerdict;
use mcpforge_transport::{StreamableTransport, TransportRequest};

use crate::response::{
    internal_error_response, mcp_error_response, transport_response,
};
use crate::server::McpServer;

/// POST: JSON-RPC messages, including the session-creating initialize.
pub(crate) async fn handle_post(
    State(server): State<McpServer>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::debug!(%error, "rejecting unparseable POST body");
            return mcp_error_response(McpError::InvalidRequest);
        }
    };

    match server.state.validator.validate(&headers, false) {
        SessionVerdict::NoSession => {
            if !is_initialize_request(&payload) {
                return mcp_error_response(McpError::InvalidRequest);
            }

            let transport = match server.state.sessions.create_session().await
            {
                Ok(transport) => transport,
                Err(error) => {
                    tracing::error!(%error, "session creation failed");
                    return internal_error_response();
                }
            };

            forward(transport, Method::POST, headers, Some(payload)).await
        }
        SessionVerdict::Valid { transport, .. } => {
            forward(transport, Method::POST, headers, Some(payload)).await
        }
        SessionVerdict::Unknown { session_id } => {
            tracing::debug!(%session_id, "POST for unknown session");
            mcp_error_response(McpError::SessionNotFound)
        }
        // Unreachable with require_session = false; kept for exhaustiveness.
        SessionVerdict::MissingHeader => {
            mcp_error_response(McpError::InvalidSessionHeader)
        }
    }
}

/// GET: the standalone server-to-client event stream.
pub(crate) async fn handle_get(
    State(server): State<McpServer>,
    headers: HeaderMap,
) -> Response {
    match server.state.validator.validate(&headers, true) {
        SessionVerdict::Valid { transport, .. } => {
            forward(transport, Method::GET, headers, None).await
        }
        SessionVerdict::MissingHeader | SessionVerdict::NoSession => {
            mcp_error_response(McpError::InvalidSessionHeader)
        }
        SessionVerdict::Unknown { session_id } => {
            tracing::debug!(%session_id, "GET for unknown session");
            mcp_error_response(McpError::SessionNotFound)
        }
    }
}

/// DELETE: explicit session termination.
pub(crate) async fn handle_delete(
    State(server): State<McpServer>,
    headers: HeaderMap,
) -> Response {
    match server.state.validator.validate(&headers, true) {
        SessionVerdict::Valid {
            session_id,
            transport,
        } => {
            let response =
                forward(transport, Method::DELETE, headers, None).await;

            // Destroy regardless of the transport's answer. The close hook
            // may have already removed the entry; that's fine.
            server.state.sessions.destroy_session(&session_id);
            response
        }
        SessionVerdict::MissingHeader | SessionVerdict::NoSession => {
            mcp_error_response(McpError::InvalidSessionHeader)
        }
        SessionVerdict::Unknown { session_id } => {
            tracing::debug!(%session_id, "DELETE for unknown session");
            mcp_error_response(McpError::SessionNotFound)
        }
    }
}

/// Hands a request to the session's transport and maps the answer back.
///
/// A transport-level failure becomes a generic 500; the detail goes to the
/// logs, not the client.
async fn forward(
    transport: Arc<dyn StreamableTransport>,
    method: Method,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
) -> Response {
    let request = TransportRequest {
        method,
        headers,
        body,
    };

    match transport.handle_request(request).await {
        Ok(response) => transport_response(response),
        Err(error) => {
            tracing::error!(%error, "transport failed to handle request");
            internal_error_response()
        }
    }
}
