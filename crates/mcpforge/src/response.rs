//! Conversions from internal results to HTTP responses.
//!
//! Two wire families live here and never mix:
//! - JSON-RPC error envelopes for session/protocol rejections, always 400
//! - OAuth error bodies for authorization rejections, status per error kind

use axum::Json;
use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use mcpforge_auth::{AuthError, www_authenticate};
use mcpforge_protocol::McpError;
use mcpforge_transport::{ResponseBody, TransportResponse};

/// A protocol rejection as its JSON-RPC envelope, delivered with 400.
pub(crate) fn mcp_error_response(error: McpError) -> Response {
    (StatusCode::BAD_REQUEST, Json(error.to_envelope())).into_response()
}

/// A generic 500 in the JSON-RPC family, for failures with no protocol
/// code of their own. Internal details stay in the logs.
pub(crate) fn internal_error_response() -> Response {
    let envelope = serde_json::json!({
        "jsonrpc": "2.0",
        "error": { "code": -32603, "message": "Internal server error" },
        "id": null,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
}

/// An authorization rejection as its OAuth body, with the
/// `WWW-Authenticate` challenge attached on 401/403.
pub(crate) fn auth_error_response(
    error: &AuthError,
    resource_metadata_url: Option<&str>,
) -> Response {
    let mut response =
        (error.status(), Json(error.to_envelope())).into_response();

    if error.is_challenge() {
        let challenge = www_authenticate(error, resource_metadata_url);
        if let Ok(value) = HeaderValue::from_str(&challenge) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
    }

    response
}

/// Maps a transport's answer onto the HTTP response verbatim.
///
/// The transport's status and headers win; the only thing added is a JSON
/// content type when the transport produced a JSON body without one.
pub(crate) fn transport_response(response: TransportResponse) -> Response {
    let TransportResponse {
        status,
        headers,
        body,
    } = response;

    let mut http_response = match body {
        ResponseBody::Empty => Response::new(Body::empty()),
        ResponseBody::Json(value) => Json(value).into_response(),
        ResponseBody::Stream(stream) => {
            Response::new(Body::from_stream(stream))
        }
    };

    *http_response.status_mut() = status;
    http_response.headers_mut().extend(headers);
    http_response
}
