//! The token verification hook.

use async_trait::async_trait;

use crate::{AuthContext, AuthError};

/// Validates a bearer credential and returns what it grants.
///
/// Implement this with your auth provider's logic. Recognized
/// [`AuthError`] kinds propagate to the client as-is;
/// [`AuthError::Unexpected`] (and anything you convert into it) is reported
/// as a generic server error with the internal detail withheld.
///
/// # Example
///
/// ```rust
/// use mcpforge_auth::{AuthContext, AuthError, TokenVerifier};
///
/// /// Accepts a single static API key. Only for development!
/// struct DevVerifier;
///
/// #[async_trait::async_trait]
/// impl TokenVerifier for DevVerifier {
///     async fn verify_access_token(
///         &self,
///         token: &str,
///     ) -> Result<AuthContext, AuthError> {
///         if token != "dev-key" {
///             return Err(AuthError::InvalidToken("Unknown token".into()));
///         }
///         Ok(AuthContext {
///             token: token.to_string(),
///             client_id: "dev-client".to_string(),
///             scopes: vec!["mcp:full".to_string()],
///             expires_at: None,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait TokenVerifier: Send + Sync + 'static {
    /// Validates the given credential.
    ///
    /// # Returns
    /// - `Ok(AuthContext)` — token is valid, here's what it grants
    /// - `Err(AuthError)` — rejection, reported per its kind
    async fn verify_access_token(
        &self,
        token: &str,
    ) -> Result<AuthContext, AuthError>;
}
