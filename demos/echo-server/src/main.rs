//! A minimal MCP server: answers initialize and echoes every other
//! JSON-RPC request back as its result.
//!
//! Run it, then exercise the endpoint:
//!
//! ```text
//! curl -X POST localhost:8080/mcp \
//!   -H 'content-type: application/json' \
//!   -d '{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}' -i
//! ```
//!
//! Set `MCP_TOKEN` to require that bearer token on every request.

use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use http::StatusCode;
use mcpforge::prelude::*;
use mcpforge::{BearerAuthOptions, MCP_SESSION_ID_HEADER};
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Engine and transport
// ---------------------------------------------------------------------------

struct EchoEngine;

#[async_trait]
impl McpEngine for EchoEngine {
    async fn connect(
        &self,
        hooks: TransportHooks,
    ) -> Result<Arc<dyn StreamableTransport>, TransportError> {
        Ok(Arc::new_cyclic(|weak: &Weak<EchoTransport>| EchoTransport {
            weak: weak.clone(),
            hooks,
            assigned: Mutex::new(None),
        }))
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

struct EchoTransport {
    weak: Weak<EchoTransport>,
    hooks: TransportHooks,
    assigned: Mutex<Option<SessionId>>,
}

#[async_trait]
impl StreamableTransport for EchoTransport {
    async fn handle_request(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        if request.method != http::Method::POST {
            return Ok(TransportResponse::empty(StatusCode::OK));
        }

        let payload = request.body.unwrap_or(Value::Null);
        let request_id = payload.get("id").cloned().unwrap_or(Value::Null);

        // First POST is the initialize exchange; assign the id and publish.
        if self.assigned.lock().unwrap().is_none() {
            let id = (self.hooks.session_id_generator)();
            *self.assigned.lock().unwrap() = Some(id.clone());
            let this = self
                .weak
                .upgrade()
                .ok_or(TransportError::Closed)?;
            (self.hooks.on_initialized)(id, this);

            let mut response = TransportResponse::json(
                StatusCode::OK,
                json!({
                    "jsonrpc": "2.0",
                    "id": request_id,
                    "result": {
                        "protocolVersion": "2025-03-26",
                        "capabilities": {},
                        "serverInfo": { "name": "echo", "version": "0.1.0" },
                    },
                }),
            );
            response.headers = self.session_headers();
            return Ok(response);
        }

        let mut response = TransportResponse::json(
            StatusCode::OK,
            json!({
                "jsonrpc": "2.0",
                "id": request_id,
                "result": { "echo": payload },
            }),
        );
        response.headers = self.session_headers();
        Ok(response)
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn session_id(&self) -> Option<SessionId> {
        self.assigned.lock().unwrap().clone()
    }
}

impl EchoTransport {
    fn session_headers(&self) -> http::HeaderMap {
        let mut headers = http::HeaderMap::new();
        if let Some(id) = self.assigned.lock().unwrap().as_ref() {
            if let Ok(value) = http::HeaderValue::from_str(id.as_str()) {
                headers.insert(MCP_SESSION_ID_HEADER, value);
            }
        }
        headers
    }
}

// ---------------------------------------------------------------------------
// Optional bearer auth
// ---------------------------------------------------------------------------

struct EnvTokenVerifier {
    token: String,
}

#[async_trait]
impl TokenVerifier for EnvTokenVerifier {
    async fn verify_access_token(
        &self,
        token: &str,
    ) -> Result<AuthContext, AuthError> {
        if token != self.token {
            return Err(AuthError::InvalidToken("Unknown token".into()));
        }
        Ok(AuthContext {
            token: token.to_string(),
            client_id: "echo-demo".to_string(),
            scopes: vec![],
            expires_at: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut builder = McpServer::builder();
    if let Ok(token) = std::env::var("MCP_TOKEN") {
        tracing::info!("bearer auth enabled");
        builder = builder.bearer_auth(BearerAuthOptions::new(Arc::new(
            EnvTokenVerifier { token },
        )));
    }
    let server = builder.build(Arc::new(EchoEngine));

    server.session_manager().on_event(|event| match event {
        SessionEvent::Created { session_id } => {
            tracing::info!(%session_id, "session opened");
        }
        SessionEvent::Destroyed { session_id } => {
            tracing::info!(%session_id, "session closed");
        }
        SessionEvent::TransportError { session_id, error } => {
            tracing::warn!(%session_id, %error, "session transport error");
        }
    });

    let app = server.router();
    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("echo MCP server listening on 0.0.0.0:8080");
    axum::serve(listener, app).await?;
    Ok(())
}
