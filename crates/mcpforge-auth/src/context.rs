//! The authorization context a verifier produces.

use serde::{Deserialize, Serialize};

/// Verified token information, attached to the request for downstream
/// handlers. Lives only for the request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// The raw bearer credential as presented.
    pub token: String,

    /// The client the token was issued to.
    pub client_id: String,

    /// Scopes granted to the token.
    pub scopes: Vec<String>,

    /// Expiry as seconds since the Unix epoch, if the token expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl AuthContext {
    /// Returns `true` if every required scope was granted.
    pub fn has_scopes(&self, required: &[String]) -> bool {
        required.iter().all(|scope| self.scopes.contains(scope))
    }
}
