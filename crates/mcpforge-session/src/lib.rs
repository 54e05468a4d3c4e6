//! Session lifecycle management for mcpforge.
//!
//! This crate owns the one piece of mutable shared state in the whole
//! system: the session table. It handles:
//!
//! 1. **Creation** — minting a transport through the protocol engine and
//!    publishing it once the initialize handshake assigns an id
//!    ([`SessionManager`])
//! 2. **Lookup and destruction** — routing requests to live transports and
//!    tearing sessions down ([`SessionManager`])
//! 3. **Validation** — classifying a request's session header against the
//!    table ([`SessionValidator`], [`SessionVerdict`])
//! 4. **Lifecycle events** — notifying observers of created/destroyed
//!    sessions and transport errors ([`SessionEvent`])
//!
//! # How it fits in the stack
//!
//! ```text
//! HTTP dispatch (above)  ← picks a verb-specific policy, forwards requests
//!     ↕
//! Session layer (this crate)  ← maps session ids to transports
//!     ↕
//! Transport layer (below)  ← StreamableTransport, McpEngine traits
//! ```

mod error;
mod events;
mod manager;
mod validator;

pub use error::SessionError;
pub use events::SessionEvent;
pub use manager::SessionManager;
pub use validator::{SessionValidator, SessionVerdict};
