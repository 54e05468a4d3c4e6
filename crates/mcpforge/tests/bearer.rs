//! End-to-end tests for the bearer gate in front of the MCP endpoint.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use http::{StatusCode, header};
use mcpforge::{
    AuthContext, AuthError, BearerAuthOptions, McpEngine, McpServer,
    TokenVerifier,
};
use serde_json::json;

use common::{
    MockEngine, TestRequest, init_tracing, initialize_payload, ping_payload,
    send,
};

/// Accepts exactly one token; everything else is rejected as configured.
struct SingleTokenVerifier {
    accept: &'static str,
    scopes: Vec<String>,
    expires_at: Option<u64>,
    rejection: AuthError,
}

impl SingleTokenVerifier {
    fn new(accept: &'static str) -> Self {
        Self {
            accept,
            scopes: vec!["mcp:read".into()],
            expires_at: None,
            rejection: AuthError::InvalidToken("Unknown token".into()),
        }
    }
}

#[async_trait]
impl TokenVerifier for SingleTokenVerifier {
    async fn verify_access_token(
        &self,
        token: &str,
    ) -> Result<AuthContext, AuthError> {
        if token != self.accept {
            return Err(self.rejection.clone());
        }
        Ok(AuthContext {
            token: token.to_string(),
            client_id: "test-client-id".to_string(),
            scopes: self.scopes.clone(),
            expires_at: self.expires_at,
        })
    }
}

fn guarded_server(options: BearerAuthOptions) -> McpServer {
    let engine = Arc::new(MockEngine::default());
    McpServer::builder()
        .bearer_auth(options)
        .build(engine as Arc<dyn McpEngine>)
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[tokio::test]
async fn test_valid_token_reaches_the_endpoint() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier::new("good-token"));
    let server = guarded_server(BearerAuthOptions::new(verifier));
    let router = server.router();

    let response = send(
        &router,
        TestRequest::post(initialize_payload()).bearer("Bearer good-token"),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.session_id().is_some());
    assert_eq!(server.stats().active_sessions, 1);
}

#[tokio::test]
async fn test_missing_authorization_header_is_401() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier::new("good-token"));
    let server = guarded_server(BearerAuthOptions::new(verifier));
    let router = server.router();

    let response =
        send(&router, TestRequest::post(initialize_payload())).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json(),
        json!({
            "error": "invalid_token",
            "error_description": "Missing Authorization header",
        })
    );
    assert_eq!(
        response.headers.get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer error=\"invalid_token\", error_description=\"Missing Authorization header\""
    );
    // The gate rejected before any session work.
    assert_eq!(server.stats().active_sessions, 0);
}

#[tokio::test]
async fn test_malformed_authorization_header_is_401() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier::new("good-token"));
    let server = guarded_server(BearerAuthOptions::new(verifier));
    let router = server.router();

    let response = send(
        &router,
        TestRequest::post(initialize_payload()).bearer("Basic dXNlcjpwdw=="),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json()["error_description"],
        "Invalid Authorization header format, expected 'Bearer TOKEN'"
    );
}

#[tokio::test]
async fn test_unknown_token_is_401() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier::new("good-token"));
    let server = guarded_server(BearerAuthOptions::new(verifier));
    let router = server.router();

    let response = send(
        &router,
        TestRequest::post(initialize_payload()).bearer("Bearer wrong-token"),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json(),
        json!({
            "error": "invalid_token",
            "error_description": "Unknown token",
        })
    );
}

#[tokio::test]
async fn test_expired_token_is_401() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier {
        expires_at: Some(unix_now() - 60),
        ..SingleTokenVerifier::new("good-token")
    });
    let server = guarded_server(BearerAuthOptions::new(verifier));
    let router = server.router();

    let response = send(
        &router,
        TestRequest::post(initialize_payload()).bearer("Bearer good-token"),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error_description"], "Token has expired");
}

#[tokio::test]
async fn test_missing_scope_is_403() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier::new("good-token"));
    let options = BearerAuthOptions::new(verifier)
        .required_scopes(["mcp:admin"]);
    let server = guarded_server(options);
    let router = server.router();

    let response = send(
        &router,
        TestRequest::post(initialize_payload()).bearer("Bearer good-token"),
    )
    .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.json(),
        json!({
            "error": "insufficient_scope",
            "error_description": "Insufficient scope",
        })
    );
    assert_eq!(
        response.headers.get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer error=\"insufficient_scope\", error_description=\"Insufficient scope\""
    );
}

#[tokio::test]
async fn test_granted_scope_passes() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier::new("good-token"));
    let options =
        BearerAuthOptions::new(verifier).required_scopes(["mcp:read"]);
    let server = guarded_server(options);
    let router = server.router();

    let response = send(
        &router,
        TestRequest::post(initialize_payload()).bearer("Bearer good-token"),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_oauth_error_from_verifier_is_400() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier {
        rejection: AuthError::OAuth {
            code: "invalid_grant".into(),
            description: "Audience validation failed".into(),
        },
        ..SingleTokenVerifier::new("good-token")
    });
    let server = guarded_server(BearerAuthOptions::new(verifier));
    let router = server.router();

    let response = send(
        &router,
        TestRequest::post(initialize_payload()).bearer("Bearer wrong-token"),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({
            "error": "invalid_grant",
            "error_description": "Audience validation failed",
        })
    );
    assert!(response.headers.get(header::WWW_AUTHENTICATE).is_none());
}

#[tokio::test]
async fn test_unexpected_verifier_failure_is_500_with_fixed_message() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier {
        rejection: AuthError::Unexpected("jwks fetch failed".into()),
        ..SingleTokenVerifier::new("good-token")
    });
    let server = guarded_server(BearerAuthOptions::new(verifier));
    let router = server.router();

    let response = send(
        &router,
        TestRequest::post(initialize_payload()).bearer("Bearer wrong-token"),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({
            "error": "server_error",
            "error_description": "Internal Server Error",
        })
    );
}

#[tokio::test]
async fn test_challenge_advertises_resource_metadata_url() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier::new("good-token"));
    let options = BearerAuthOptions::new(verifier)
        .resource_metadata_url("https://mcp.example.com/.well-known/oauth-protected-resource");
    let server = guarded_server(options);
    let router = server.router();

    let response =
        send(&router, TestRequest::post(initialize_payload())).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers.get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer error=\"invalid_token\", error_description=\"Missing Authorization header\", \
         resource_metadata=\"https://mcp.example.com/.well-known/oauth-protected-resource\""
    );
}

#[tokio::test]
async fn test_gate_guards_every_verb() {
    init_tracing();
    let verifier = Arc::new(SingleTokenVerifier::new("good-token"));
    let server = guarded_server(BearerAuthOptions::new(verifier));
    let router = server.router();

    let session_id = {
        let response = send(
            &router,
            TestRequest::post(initialize_payload())
                .bearer("Bearer good-token"),
        )
        .await;
        response.session_id().expect("session created")
    };

    let get = send(&router, TestRequest::get().session(&session_id)).await;
    assert_eq!(get.status, StatusCode::UNAUTHORIZED);

    let delete =
        send(&router, TestRequest::delete().session(&session_id)).await;
    assert_eq!(delete.status, StatusCode::UNAUTHORIZED);

    // The unauthorized DELETE destroyed nothing.
    assert_eq!(server.stats().active_sessions, 1);

    let authorized_delete = send(
        &router,
        TestRequest::delete()
            .session(&session_id)
            .bearer("Bearer good-token"),
    )
    .await;
    assert_eq!(authorized_delete.status, StatusCode::OK);
    assert_eq!(server.stats().active_sessions, 0);

    // An authorized POST on the destroyed session hits the session layer.
    let replay = send(
        &router,
        TestRequest::post(ping_payload())
            .session(&session_id)
            .bearer("Bearer good-token"),
    )
    .await;
    assert_eq!(replay.status, StatusCode::BAD_REQUEST);
    assert_eq!(replay.json()["error"]["code"], -32003);
}
