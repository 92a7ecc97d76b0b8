//! Wire envelope for the backend channel.
//!
//! All communication happens over a Unix socket using newline-delimited
//! JSON. Each message is a single JSON object followed by a newline:
//!
//! * call  `{"id": 7, "command": "get_vault", "args": {"vault_key": "work"}}`
//! * reply `{"id": 7, "result": {...}}` or `{"id": 7, "error": "Vault not found"}`
//! * event `{"event": "pinentry-request", "payload": {...}}`
//!
//! Replies are correlated to calls by `id` and may arrive out of order.
//! Events are unsolicited and can arrive at any time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DeskError, Result};

/// A call from the front-end to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Call {
    /// Correlation id, unique per connection
    pub id: u64,
    /// The backend command to invoke
    pub command: String,
    /// Command arguments, always a JSON object
    #[serde(default)]
    pub args: Value,
}

/// The backend's answer to one call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reply {
    /// Id of the call this answers
    pub id: u64,
    /// Result on success (absent or null for commands with no output)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A push event emitted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Event channel name, e.g. `pinentry-request`
    pub event: String,
    /// Event payload
    #[serde(default)]
    pub payload: Value,
}

/// Anything the backend may write on the socket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Incoming {
    Reply(Reply),
    Event(Event),
}

impl Call {
    pub fn new(id: u64, command: impl Into<String>, args: Value) -> Self {
        Self {
            id,
            command: command.into(),
            args,
        }
    }
}

impl Reply {
    /// Create a success reply
    pub fn ok(id: u64, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error reply
    pub fn error(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(message.into()),
        }
    }

    /// Turn the reply into the call's outcome. An `error` always wins.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(message) => Err(DeskError::backend(message)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

impl Event {
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }
}

/// Serialize a message as one protocol line (JSON + `\n`).
pub fn encode_line<T: Serialize>(message: &T) -> Result<String> {
    Ok(serde_json::to_string(message)? + "\n")
}

/// Parse one line read from the backend.
pub fn decode_line(line: &str) -> Result<Incoming> {
    Ok(serde_json::from_str(line.trim())?)
}
