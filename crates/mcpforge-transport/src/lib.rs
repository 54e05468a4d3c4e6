//! Transport abstraction layer for mcpforge.
//!
//! Provides the [`StreamableTransport`] and [`McpEngine`] traits that abstract
//! over the downstream MCP protocol engine. The engine owns message framing
//! and streaming (JSON responses, SSE event streams); this layer only defines
//! the seam the session core talks through.
//!
//! A transport is created *before* its session id is known: the id is chosen
//! by the initialize handshake, not by the caller. [`TransportHooks`] carries
//! the deferred id-assignment callback along with close and error callbacks,
//! so the session layer learns about lifecycle transitions without the
//! transport knowing anything about the session table.

mod error;

pub use error::TransportError;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use http::{HeaderMap, Method, StatusCode};

/// Opaque identifier for a session.
///
/// Assigned by the protocol engine when the initialize exchange completes.
/// High-entropy (UUID v4 by default), so destroyed ids are never reissued
/// in practice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a `SessionId` from a raw string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the underlying `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle callbacks wired into a transport at creation time.
///
/// The session layer builds one of these per [`McpEngine::connect`] call.
/// The engine must invoke `on_initialized` exactly once, when the initialize
/// exchange has assigned a session id — handing back the transport itself so
/// the caller can publish it. `on_close` and `on_error` may fire at any point
/// after that.
pub struct TransportHooks {
    /// Produces the session id the engine assigns during initialization.
    pub session_id_generator: Box<dyn Fn() -> SessionId + Send + Sync>,

    /// Fired once when the initialize exchange completes. The transport is
    /// not observable by lookups until this runs.
    pub on_initialized:
        Box<dyn Fn(SessionId, Arc<dyn StreamableTransport>) + Send + Sync>,

    /// Fired when the transport closes on its own (client went away,
    /// engine shut the stream down).
    pub on_close: Box<dyn Fn(SessionId) + Send + Sync>,

    /// Fired on transport-level failures after initialization.
    pub on_error: Box<dyn Fn(SessionId, TransportError) + Send + Sync>,
}

impl fmt::Debug for TransportHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportHooks").finish_non_exhaustive()
    }
}

/// An HTTP request handed to a transport for protocol handling.
///
/// The session core has already routed it; the transport decides what the
/// protocol response looks like (including the framing of streamed bodies).
#[derive(Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub headers: HeaderMap,
    /// Decoded JSON-RPC payload for POST requests; `None` for GET/DELETE.
    pub body: Option<serde_json::Value>,
}

/// A transport's answer to a forwarded request.
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl TransportResponse {
    /// Convenience constructor for a JSON-bodied response.
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Json(body),
        }
    }

    /// Convenience constructor for a bodiless response.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
        }
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}

/// Response payload produced by a transport.
pub enum ResponseBody {
    /// No body (e.g. a DELETE acknowledgement).
    Empty,
    /// A single JSON document.
    Json(serde_json::Value),
    /// A streamed body (e.g. an SSE event stream). The framing inside the
    /// bytes is entirely the transport's business.
    Stream(BoxStream<'static, Result<Bytes, std::io::Error>>),
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Empty => f.write_str("Empty"),
            ResponseBody::Json(value) => {
                f.debug_tuple("Json").field(value).finish()
            }
            ResponseBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// A per-session protocol transport.
///
/// One transport serves exactly one session for its entire lifetime. It is
/// shared across request tasks, hence `Send + Sync` and `&self` methods.
#[async_trait]
pub trait StreamableTransport: Send + Sync + 'static {
    /// Handles a protocol request end to end and produces the HTTP answer.
    async fn handle_request(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError>;

    /// Closes the transport, tearing down any open stream.
    async fn close(&self) -> Result<(), TransportError>;

    /// The session id assigned by the initialize exchange, if it has
    /// completed.
    fn session_id(&self) -> Option<SessionId>;
}

/// The downstream MCP protocol engine that mints transports.
///
/// This is the stateful, long-lived collaborator the session core fronts.
/// `connect` is called once per new session; `close` during shutdown.
#[async_trait]
pub trait McpEngine: Send + Sync + 'static {
    /// Establishes a new transport bound to the given lifecycle hooks.
    ///
    /// On failure no session state exists anywhere; the caller simply
    /// propagates the error.
    async fn connect(
        &self,
        hooks: TransportHooks,
    ) -> Result<Arc<dyn StreamableTransport>, TransportError>;

    /// Shuts the engine down. Called after all sessions are destroyed.
    async fn close(&self) -> Result<(), TransportError>;
}
