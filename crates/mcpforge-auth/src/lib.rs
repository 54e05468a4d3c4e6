//! Bearer token authorization for mcpforge.
//!
//! mcpforge doesn't validate tokens itself — that's your auth provider's
//! job (an OAuth introspection endpoint, JWT validation, an API-key table).
//! This crate defines the [`TokenVerifier`] trait for that seam and the
//! [`BearerAuthGate`] that runs the full pre-dispatch check:
//!
//! 1. Extract the `Authorization` header
//! 2. Check the `Bearer <token>` shape
//! 3. Call the verifier
//! 4. Check required scopes
//! 5. Check expiry
//!
//! Failures map onto the OAuth error envelope
//! (`{"error": "...", "error_description": "..."}`) with the matching HTTP
//! status and a `WWW-Authenticate` header on 401/403 responses.
//!
//! The gate only exists when the host configures a verifier; otherwise no
//! auth code runs at all.

mod context;
mod error;
mod gate;
mod verifier;

pub use context::AuthContext;
pub use error::{AuthError, OAuthErrorBody, www_authenticate};
pub use gate::{BearerAuthGate, BearerAuthOptions};
pub use verifier::TokenVerifier;
