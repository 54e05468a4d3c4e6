//! Shared test doubles and request helpers for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use futures_util::stream;
use http::{HeaderMap, HeaderValue, Request, StatusCode, header};
use http_body_util::BodyExt;
use mcpforge::{
    MCP_SESSION_ID_HEADER, McpEngine, McpServer, ResponseBody, SessionId,
    StreamableTransport, TransportError, TransportHooks, TransportRequest,
    TransportResponse,
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =========================================================================
// Mock protocol engine
// =========================================================================

/// A minimal protocol engine that speaks just enough MCP for these tests.
///
/// Its transports complete the initialize exchange inside the first POST:
/// the id generator and `on_initialized` hook run before the response is
/// returned, exactly when a real engine would publish the session.
#[derive(Default)]
pub struct MockEngine {
    pub fail_connect: bool,
    pub closed: AtomicBool,
}

impl MockEngine {
    pub fn failing() -> Self {
        Self {
            fail_connect: true,
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl McpEngine for MockEngine {
    async fn connect(
        &self,
        hooks: TransportHooks,
    ) -> Result<Arc<dyn StreamableTransport>, TransportError> {
        if self.fail_connect {
            return Err(TransportError::ConnectionFailed(
                "engine refused".into(),
            ));
        }

        let transport = Arc::new_cyclic(|weak: &Weak<MockTransport>| {
            MockTransport {
                weak: weak.clone(),
                hooks,
                assigned: Mutex::new(None),
            }
        });
        Ok(transport)
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MockTransport {
    weak: Weak<MockTransport>,
    hooks: TransportHooks,
    assigned: Mutex<Option<SessionId>>,
}

impl MockTransport {
    /// Headers echoing the assigned session id, as a real engine does.
    fn session_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(id) = self.assigned.lock().unwrap().as_ref() {
            headers.insert(
                MCP_SESSION_ID_HEADER,
                HeaderValue::from_str(id.as_str()).unwrap(),
            );
        }
        headers
    }
}

#[async_trait]
impl StreamableTransport for MockTransport {
    async fn handle_request(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        match request.method.as_str() {
            "POST" => {
                let payload = request.body.unwrap_or(Value::Null);
                let request_id =
                    payload.get("id").cloned().unwrap_or(Value::Null);

                if self.assigned.lock().unwrap().is_none() {
                    let id = (self.hooks.session_id_generator)();
                    *self.assigned.lock().unwrap() = Some(id.clone());
                    let this =
                        self.weak.upgrade().expect("transport still alive");
                    (self.hooks.on_initialized)(id, this);

                    let mut response = TransportResponse::json(
                        StatusCode::OK,
                        json!({
                            "jsonrpc": "2.0",
                            "id": request_id,
                            "result": {
                                "protocolVersion": "2025-03-26",
                                "capabilities": {},
                                "serverInfo": {
                                    "name": "mock-server",
                                    "version": "0.0.0",
                                },
                            },
                        }),
                    );
                    response.headers = self.session_headers();
                    Ok(response)
                } else {
                    let mut response = TransportResponse::json(
                        StatusCode::OK,
                        json!({
                            "jsonrpc": "2.0",
                            "id": request_id,
                            "result": {},
                        }),
                    );
                    response.headers = self.session_headers();
                    Ok(response)
                }
            }
            "GET" => {
                let mut headers = self.session_headers();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/event-stream"),
                );
                Ok(TransportResponse {
                    status: StatusCode::OK,
                    headers,
                    body: ResponseBody::Stream(Box::pin(stream::iter(vec![
                        Ok::<_, std::io::Error>(Bytes::from_static(
                            b"event: message\ndata: {}\n\n",
                        )),
                    ]))),
                })
            }
            "DELETE" => Ok(TransportResponse {
                status: StatusCode::OK,
                headers: self.session_headers(),
                body: ResponseBody::Empty,
            }),
            other => Err(TransportError::RequestFailed(format!(
                "unsupported method {other}"
            ))),
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn session_id(&self) -> Option<SessionId> {
        self.assigned.lock().unwrap().clone()
    }
}

// =========================================================================
// Request helpers
// =========================================================================

pub fn initialize_payload() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" },
        },
    })
}

pub fn ping_payload() -> Value {
    json!({ "jsonrpc": "2.0", "id": 2, "method": "ping" })
}

pub struct TestRequest {
    pub method: &'static str,
    pub session_id: Option<String>,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl TestRequest {
    pub fn post(body: Value) -> Self {
        Self {
            method: "POST",
            session_id: None,
            bearer: None,
            body: Some(body),
        }
    }

    pub fn get() -> Self {
        Self {
            method: "GET",
            session_id: None,
            bearer: None,
            body: None,
        }
    }

    pub fn delete() -> Self {
        Self {
            method: "DELETE",
            session_id: None,
            bearer: None,
            body: None,
        }
    }

    pub fn session(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn bearer(mut self, header_value: impl Into<String>) -> Self {
        self.bearer = Some(header_value.into());
        self
    }

    fn build(self) -> Request<Body> {
        let mut builder = Request::builder()
            .method(self.method)
            .uri("/mcp")
            .header(header::ACCEPT, "application/json, text/event-stream");
        if let Some(id) = self.session_id {
            builder = builder.header(MCP_SESSION_ID_HEADER, id);
        }
        if let Some(bearer) = self.bearer {
            builder = builder.header(header::AUTHORIZATION, bearer);
        }

        match self.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn session_id(&self) -> Option<String> {
        self.headers
            .get(MCP_SESSION_ID_HEADER)
            .map(|v| v.to_str().unwrap().to_string())
    }
}

/// Sends one request through the router and collects the response.
pub async fn send(router: &Router, request: TestRequest) -> TestResponse {
    let response = router
        .clone()
        .oneshot(request.build())
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// A server over a fresh mock engine, plus the engine for assertions.
pub fn mock_server() -> (McpServer, Arc<MockEngine>) {
    let engine = Arc::new(MockEngine::default());
    let server = McpServer::builder()
        .build(Arc::clone(&engine) as Arc<dyn McpEngine>);
    (server, engine)
}

/// Initializes a session through the router and returns its id.
pub async fn open_session(router: &Router) -> String {
    let response = send(router, TestRequest::post(initialize_payload())).await;
    assert_eq!(response.status, StatusCode::OK);
    response.session_id().expect("initialize assigns a session id")
}
