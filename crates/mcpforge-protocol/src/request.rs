//! Request body inspection.

use serde_json::Value;

/// Returns `true` if the payload is (or contains) an `initialize` request.
///
/// A session-less POST is only legal when it opens the handshake. The
/// streamable HTTP transport allows batched payloads, so an array counts if
/// any element is an initialize call.
pub fn is_initialize_request(body: &Value) -> bool {
    match body {
        Value::Object(object) => {
            object.get("method").and_then(Value::as_str) == Some("initialize")
        }
        Value::Array(items) => items.iter().any(is_initialize_request),
        _ => false,
    }
}
