//! The server: wiring between axum, the session layer, and the auth gate.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::post;
use mcpforge_auth::{BearerAuthGate, BearerAuthOptions};
use mcpforge_protocol::MCP_DEFAULT_ENDPOINT;
use mcpforge_session::{SessionManager, SessionValidator};
use mcpforge_transport::McpEngine;
use serde::Serialize;

use crate::error::McpforgeError;
use crate::handlers;
use crate::response::auth_error_response;

/// Builder for [`McpServer`].
pub struct McpServerBuilder {
    endpoint: String,
    bearer: Option<BearerAuthOptions>,
}

impl McpServerBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: MCP_DEFAULT_ENDPOINT.to_string(),
            bearer: None,
        }
    }

    /// Overrides the endpoint path (default `/mcp`).
    pub fn endpoint(mut self, path: impl Into<String>) -> Self {
        self.endpoint = path.into();
        self
    }

    /// Enables the bearer authorization gate in front of every verb.
    pub fn bearer_auth(mut self, options: BearerAuthOptions) -> Self {
        self.bearer = Some(options);
        self
    }

    /// Assembles the server around the given protocol engine.
    pub fn build(self, engine: Arc<dyn McpEngine>) -> McpServer {
        let sessions = SessionManager::new(Arc::clone(&engine));
        let validator = SessionValidator::new(sessions.clone());

        McpServer {
            state: Arc::new(ServerState {
                sessions,
                validator,
                engine,
                endpoint: self.endpoint,
                bearer: self.bearer.map(BearerAuthGate::new),
            }),
        }
    }
}

impl Default for McpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct ServerState {
    pub(crate) sessions: SessionManager,
    pub(crate) validator: SessionValidator,
    pub(crate) engine: Arc<dyn McpEngine>,
    pub(crate) endpoint: String,
    pub(crate) bearer: Option<BearerAuthGate>,
}

/// A streamable HTTP MCP server.
///
/// Serves POST, GET and DELETE on one endpoint and owns the session table.
/// Cheap to clone; clones share all state. Mount the [`Router`] from
/// [`McpServer::router`] wherever you serve HTTP.
#[derive(Clone)]
pub struct McpServer {
    pub(crate) state: Arc<ServerState>,
}

/// A point-in-time snapshot of server state, for health endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ServerStats {
    pub active_sessions: usize,
    pub endpoint: String,
}

impl McpServer {
    pub fn builder() -> McpServerBuilder {
        McpServerBuilder::new()
    }

    /// Builds the router serving the MCP endpoint.
    ///
    /// When bearer auth is configured the gate runs before any dispatch,
    /// so unauthorized requests never touch the session table.
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route(
                &self.state.endpoint,
                post(handlers::handle_post)
                    .get(handlers::handle_get)
                    .delete(handlers::handle_delete),
            )
            .with_state(self.clone());

        if self.state.bearer.is_some() {
            router.layer(middleware::from_fn_with_state(
                self.clone(),
                bearer_guard,
            ))
        } else {
            router
        }
    }

    /// The session manager, for event observers and direct lookups.
    pub fn session_manager(&self) -> &SessionManager {
        &self.state.sessions
    }

    /// The endpoint path this server is routed on.
    pub fn endpoint(&self) -> &str {
        &self.state.endpoint
    }

    pub fn stats(&self) -> ServerStats {
        ServerStats {
            active_sessions: self.state.sessions.session_count(),
            endpoint: self.state.endpoint.clone(),
        }
    }

    /// Graceful shutdown: destroys every session, then closes the engine.
    pub async fn shutdown(&self) -> Result<(), McpforgeError> {
        tracing::info!("shutting down MCP server");
        self.state.sessions.destroy_all_sessions().await;
        self.state.engine.close().await?;
        Ok(())
    }
}

/// Middleware enforcing the bearer gate on every request.
///
/// On success the verified [`AuthContext`](mcpforge_auth::AuthContext) is
/// attached to the request extensions for downstream handlers.
async fn bearer_guard(
    State(server): State<McpServer>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(gate) = server.state.bearer.as_ref() else {
        return next.run(request).await;
    };

    match gate.authorize(request.headers()).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(error) => {
            tracing::debug!(
                code = error.error_code(),
                "rejecting unauthorized request"
            );
            auth_error_response(&error, gate.resource_metadata_url())
        }
    }
}
