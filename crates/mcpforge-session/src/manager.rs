//! The session manager: tracks every live MCP session.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Creating transports through the protocol engine
//! - Publishing a session once the initialize handshake assigns its id
//! - Routing lookups to the owning transport
//! - Destroying sessions (explicit DELETE, transport closure, shutdown)
//! - Emitting lifecycle events to registered observers
//!
//! # Concurrency note
//!
//! Requests are served concurrently, one task per inbound HTTP request, and
//! this table is the only state they share. A single `std::sync::Mutex`
//! guards every read and write; critical sections are pure map operations
//! and never await. Transport I/O always happens after the guard is
//! dropped. Insertion inside the `on_initialized` hook is the atomic
//! publish point: a transport is unobservable by lookups until its id is
//! assigned.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard};

use mcpforge_transport::{
    McpEngine, SessionId, StreamableTransport, TransportHooks,
};
use uuid::Uuid;

use crate::{SessionError, SessionEvent};

type Observer = Arc<dyn Fn(&SessionEvent) + Send + Sync>;
type SessionTable = HashMap<SessionId, Arc<dyn StreamableTransport>>;

/// Manages all live MCP sessions.
///
/// Cheap to clone — clones share the same table. No other component holds a
/// reference to the table itself; everything goes through these operations.
///
/// ## Lifecycle
///
/// ```text
/// create_session() ──→ [initialize handshake] ──→ on_initialized ──→ Active
///                                                                      │
///                 DELETE / transport close / destroy_all_sessions()    ▼
///                                                                   Closed
/// ```
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    engine: Arc<dyn McpEngine>,
    sessions: Mutex<SessionTable>,
    observers: Mutex<Vec<Observer>>,
}

impl ManagerInner {
    /// Locks the session table.
    ///
    /// Critical sections never panic and never await, so poisoning cannot
    /// occur in practice.
    fn table(&self) -> MutexGuard<'_, SessionTable> {
        self.sessions.lock().expect("session table lock poisoned")
    }

    /// Removes a session and emits `Destroyed` exactly once.
    ///
    /// Shared by the public `destroy_session`, the transport `on_close`
    /// hook, and shutdown. The remove-and-decide step happens under one
    /// lock acquisition, so concurrent racers for the same id observe
    /// exactly one `true`.
    fn destroy(self: &Arc<Self>, session_id: &SessionId) -> bool {
        let removed = self.table().remove(session_id);
        match removed {
            Some(_transport) => {
                tracing::info!(%session_id, "session destroyed");
                self.emit(&SessionEvent::Destroyed {
                    session_id: session_id.clone(),
                });
                true
            }
            None => false,
        }
    }

    /// Delivers an event to every observer, in registration order.
    ///
    /// The observer list is snapshotted first so no lock is held during
    /// delivery. Each invocation is isolated: a panicking observer is
    /// logged and skipped, the rest still run.
    fn emit(&self, event: &SessionEvent) {
        let observers: Vec<Observer> = self
            .observers
            .lock()
            .expect("observer list lock poisoned")
            .clone();

        for observer in observers {
            let delivery = catch_unwind(AssertUnwindSafe(|| observer(event)));
            if delivery.is_err() {
                tracing::warn!(
                    session_id = %event.session_id(),
                    "session event observer panicked"
                );
            }
        }
    }
}

impl SessionManager {
    /// Creates an empty session manager fronting the given engine.
    pub fn new(engine: Arc<dyn McpEngine>) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                engine,
                sessions: Mutex::new(HashMap::new()),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a new transport and, eventually, a session.
    ///
    /// The session id is not chosen here: the engine assigns it when the
    /// initialize exchange completes, at which point the `on_initialized`
    /// hook inserts the entry and fires [`SessionEvent::Created`]. The
    /// returned transport is usable immediately (it buffers the initial
    /// exchange) but does not appear in lookups until then.
    ///
    /// # Errors
    /// Returns [`SessionError::ConnectionFailed`] if the engine refuses the
    /// connection; no table entry is added in that case.
    pub async fn create_session(
        &self,
    ) -> Result<Arc<dyn StreamableTransport>, SessionError> {
        let init = Arc::clone(&self.inner);
        let close = Arc::clone(&self.inner);
        let error = Arc::clone(&self.inner);

        let hooks = TransportHooks {
            session_id_generator: Box::new(|| {
                SessionId::new(Uuid::new_v4().to_string())
            }),
            on_initialized: Box::new(move |session_id, transport| {
                init.table().insert(session_id.clone(), transport);
                tracing::info!(%session_id, "session created");
                init.emit(&SessionEvent::Created { session_id });
            }),
            on_close: Box::new(move |session_id| {
                close.destroy(&session_id);
            }),
            on_error: Box::new(move |session_id, transport_error| {
                tracing::warn!(
                    %session_id,
                    error = %transport_error,
                    "session transport error"
                );
                error.emit(&SessionEvent::TransportError {
                    session_id,
                    error: transport_error,
                });
            }),
        };

        self.inner
            .engine
            .connect(hooks)
            .await
            .map_err(SessionError::ConnectionFailed)
    }

    /// Looks up a session's transport by id. Pure read, no side effects.
    pub fn get_session(
        &self,
        session_id: &SessionId,
    ) -> Option<Arc<dyn StreamableTransport>> {
        self.inner.table().get(session_id).cloned()
    }

    /// Destroys a session if it exists.
    ///
    /// Fires [`SessionEvent::Destroyed`] exactly once on a successful
    /// removal. Idempotent: a second call for the same id is a no-op
    /// returning `false`.
    pub fn destroy_session(&self, session_id: &SessionId) -> bool {
        self.inner.destroy(session_id)
    }

    /// Destroys every session, closing each transport.
    ///
    /// Used for process shutdown. One [`SessionEvent::Destroyed`] fires per
    /// removed entry; order is unspecified. Safe to run concurrently with
    /// in-flight requests — the drain is atomic, and requests holding a
    /// removed transport fail at the transport layer.
    pub async fn destroy_all_sessions(&self) {
        let drained: Vec<(SessionId, Arc<dyn StreamableTransport>)> =
            self.inner.table().drain().collect();

        for (session_id, transport) in drained {
            if let Err(error) = transport.close().await {
                tracing::warn!(
                    %session_id,
                    %error,
                    "transport close failed during shutdown"
                );
            }
            tracing::info!(%session_id, "session destroyed");
            self.inner.emit(&SessionEvent::Destroyed { session_id });
        }
    }

    /// Returns the number of live sessions.
    pub fn session_count(&self) -> usize {
        self.inner.table().len()
    }

    /// Registers a lifecycle observer.
    ///
    /// Observers run synchronously after the mutation they describe, in
    /// registration order. A panicking observer is isolated; it cannot
    /// corrupt the table or block later observers.
    pub fn on_event<F>(&self, observer: F)
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.inner
            .observers
            .lock()
            .expect("observer list lock poisoned")
            .push(Arc::new(observer));
    }
}

// =========================================================================
// Tests
// =========================================================================
