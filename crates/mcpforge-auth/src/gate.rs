//! The bearer authorization gate.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use http::HeaderMap;

use crate::{AuthContext, AuthError, TokenVerifier};

/// Configuration for bearer authorization.
#[derive(Clone)]
pub struct BearerAuthOptions {
    /// The external verifier that validates credentials.
    pub verifier: Arc<dyn TokenVerifier>,

    /// Scopes every request must be granted. Empty means no scope check.
    pub required_scopes: Vec<String>,

    /// Advertised in `WWW-Authenticate` challenges when set, per the
    /// OAuth 2.0 Protected Resource Metadata spec.
    pub resource_metadata_url: Option<String>,
}

impl BearerAuthOptions {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            verifier,
            required_scopes: Vec::new(),
            resource_metadata_url: None,
        }
    }

    pub fn required_scopes(
        mut self,
        scopes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.required_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn resource_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.resource_metadata_url = Some(url.into());
        self
    }
}

/// Pre-dispatch bearer check.
///
/// Runs before any session logic; a rejected request never touches the
/// session table. Stateless given its inputs.
pub struct BearerAuthGate {
    options: BearerAuthOptions,
}

impl BearerAuthGate {
    pub fn new(options: BearerAuthOptions) -> Self {
        Self { options }
    }

    /// The configured resource-metadata URL, for challenge headers.
    pub fn resource_metadata_url(&self) -> Option<&str> {
        self.options.resource_metadata_url.as_deref()
    }

    /// Authorizes a request from its headers.
    ///
    /// Checks run in a fixed order: header presence, `Bearer` shape,
    /// verifier, scopes, expiry. The first failure wins.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
    ) -> Result<AuthContext, AuthError> {
        let token = extract_bearer_token(headers)?;

        let context = match self.options.verifier.verify_access_token(token).await
        {
            Ok(context) => context,
            Err(AuthError::Unexpected(detail)) => {
                tracing::error!(%detail, "token verification failed unexpectedly");
                return Err(AuthError::Unexpected(detail));
            }
            Err(rejection) => return Err(rejection),
        };

        if !self.options.required_scopes.is_empty()
            && !context.has_scopes(&self.options.required_scopes)
        {
            return Err(AuthError::InsufficientScope(
                "Insufficient scope".to_string(),
            ));
        }

        if let Some(expires_at) = context.expires_at {
            if expires_at < unix_now() {
                return Err(AuthError::InvalidToken(
                    "Token has expired".to_string(),
                ));
            }
        }

        Ok(context)
    }
}

/// Pulls the credential out of the `Authorization` header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let Some(value) = headers.get(http::header::AUTHORIZATION) else {
        return Err(AuthError::InvalidToken(
            "Missing Authorization header".to_string(),
        ));
    };

    let value = value.to_str().map_err(|_| malformed_header())?;
    let mut parts = value.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default();

    // A leading space means the credential slot after the single
    // separator was empty ("Bearer  x").
    if !scheme.eq_ignore_ascii_case("bearer")
        || token.is_empty()
        || token.starts_with(' ')
    {
        return Err(malformed_header());
    }

    Ok(token)
}

fn malformed_header() -> AuthError {
    AuthError::InvalidToken(
        "Invalid Authorization header format, expected 'Bearer TOKEN'"
            .to_string(),
    )
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// =========================================================================
// Tests
// =========================================================================
