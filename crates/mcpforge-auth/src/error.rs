//! The auth-layer error taxonomy and its wire representation.
//!
//! These errors travel in the OAuth envelope, not the JSON-RPC one:
//!
//! ```json
//! { "error": "invalid_token", "error_description": "Token has expired" }
//! ```
//!
//! Status mapping: 401 `invalid_token`, 403 `insufficient_scope`, 400 for
//! other OAuth protocol errors, 500 for server errors.

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Errors produced while authorizing a request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// The credential is missing, malformed, or expired.
    #[error("{0}")]
    InvalidToken(String),

    /// The token is valid but doesn't grant the required scopes.
    #[error("{0}")]
    InsufficientScope(String),

    /// A verifier-reported OAuth protocol failure with its own error code
    /// (e.g. `invalid_grant`). Passed through to the client unchanged.
    #[error("{description}")]
    OAuth { code: String, description: String },

    /// A verifier-reported server-side failure. The description is the
    /// verifier's own and is safe to surface.
    #[error("{0}")]
    Server(String),

    /// An unexpected internal failure. The carried detail is for logs
    /// only; clients always see the fixed public message.
    #[error("Internal Server Error")]
    Unexpected(String),
}

impl AuthError {
    /// The OAuth `error` code for this kind.
    pub fn error_code(&self) -> &str {
        match self {
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::InsufficientScope(_) => "insufficient_scope",
            AuthError::OAuth { code, .. } => code,
            AuthError::Server(_) | AuthError::Unexpected(_) => "server_error",
        }
    }

    /// The `error_description` clients see. For `Unexpected` this is the
    /// fixed public message, never the internal detail.
    pub fn error_description(&self) -> String {
        self.to_string()
    }

    /// The HTTP status this error is delivered with.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientScope(_) => StatusCode::FORBIDDEN,
            AuthError::OAuth { .. } => StatusCode::BAD_REQUEST,
            AuthError::Server(_) | AuthError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the OAuth error envelope body.
    pub fn to_envelope(&self) -> OAuthErrorBody {
        OAuthErrorBody {
            error: self.error_code().to_string(),
            error_description: self.error_description(),
        }
    }

    /// Whether the response must carry a `WWW-Authenticate` header
    /// (401 and 403 challenges per RFC 6750).
    pub fn is_challenge(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken(_) | AuthError::InsufficientScope(_)
        )
    }
}

/// The OAuth 2.0 error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthErrorBody {
    pub error: String,
    pub error_description: String,
}

/// Formats the `WWW-Authenticate` challenge for a 401/403 response.
///
/// `resource_metadata` is appended only when a resource-metadata URL was
/// configured, per the OAuth 2.0 Protected Resource Metadata spec.
pub fn www_authenticate(
    error: &AuthError,
    resource_metadata_url: Option<&str>,
) -> String {
    let base = format!(
        "Bearer error=\"{}\", error_description=\"{}\"",
        error.error_code(),
        error.error_description()
    );
    match resource_metadata_url {
        Some(url) => format!("{base}, resource_metadata=\"{url}\""),
        None => base,
    }
}
