//! Machine protocol for the command loop
//!
//! Newline-delimited JSON wrapped in brackets:
//! requests `[{"id": N, "method": "..."}]`,
//! replies `[{"id": N, "result": ...}]`, unsolicited events
//! `[{"event": "...", "params": {...}}]`. Bare `START`/`STOP` tokens are
//! the host-level intents and map 1:1 onto the service transitions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use trackd_core::ServiceEvent;

use crate::bridge::{CommandReply, Payload};

/// Strip the outer brackets from a protocol line
///
/// Messages are wrapped in `[...]` for resilience. Returns the inner
/// content if brackets are present.
pub(crate) fn strip_brackets(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        Some(&trimmed[1..trimmed.len() - 1])
    } else {
        None
    }
}

/// A raw command request (before method resolution)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawRequest {
    pub id: Value,
    pub method: String,
}

impl RawRequest {
    /// Parse a JSON string into a RawRequest
    pub fn parse(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// Host-level string-tagged intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start the service (maps to the Start transition)
    Start,
    /// Stop the service (maps to the Stop transition)
    Stop,
    /// Terminate the hosting process
    Quit,
}

/// A parsed inbound protocol line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A command request awaiting a reply tagged with the same id
    Request { id: Value, method: String },
    /// A fire-and-forget host intent
    Intent(Intent),
}

/// Parse one line of inbound protocol traffic.
///
/// Accepts bracketed and bare JSON requests, plus the bare intent
/// tokens. Returns `None` for blank or malformed lines -- the loop skips
/// those with a warning rather than failing.
pub fn parse_line(line: &str) -> Option<Inbound> {
    let trimmed = line.trim();

    match trimmed {
        "" => return None,
        "START" => return Some(Inbound::Intent(Intent::Start)),
        "STOP" => return Some(Inbound::Intent(Intent::Stop)),
        "QUIT" => return Some(Inbound::Intent(Intent::Quit)),
        _ => {}
    }

    let json = strip_brackets(trimmed).unwrap_or(trimmed);
    let raw = RawRequest::parse(json)?;
    Some(Inbound::Request {
        id: raw.id,
        method: raw.method,
    })
}

// ─────────────────────────────────────────────────────────
// Outbound Formatting
// ─────────────────────────────────────────────────────────

/// Format a command reply for the wire, tagged with the request id.
///
/// Unit successes serialize as `{"success": true}`; permission
/// snapshots collapse to the combined granted bool, which is the
/// contract with the application layer.
pub fn format_reply(id: &Value, reply: &CommandReply) -> String {
    let body = match reply {
        CommandReply::Success { payload } => {
            let result = match payload {
                Payload::Unit => json!({ "success": true }),
                Payload::Null => Value::Null,
                Payload::Permissions(snapshot) => json!(snapshot.granted()),
            };
            json!({ "id": id, "result": result })
        }
        CommandReply::Error { kind, message } => json!({
            "id": id,
            "error": { "code": kind, "message": message },
        }),
        CommandReply::Unimplemented { method } => json!({
            "id": id,
            "error": {
                "code": "UNIMPLEMENTED",
                "message": format!("Unrecognized command method: {}", method),
            },
        }),
    };

    format!("[{}]", body)
}

/// Format an unsolicited lifecycle event for the wire
pub fn format_event(event: &ServiceEvent) -> String {
    let body = json!({ "event": event.name(), "params": event.params() });
    format!("[{}]", body)
}
