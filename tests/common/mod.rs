//! A scripted backend listening on a Unix socket.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// A fresh socket path in its own temp directory.
pub fn socket_path() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vaultdesk-{}", Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("backend.sock")
}

pub fn reply(call: &Value, result: Value) -> Value {
    json!({"id": call["id"], "result": result})
}

pub fn error_reply(call: &Value, message: &str) -> Value {
    json!({"id": call["id"], "error": message})
}

pub fn event(name: &str, payload: Value) -> Value {
    json!({"event": name, "payload": payload})
}

/// Accept one connection and answer each call line with the lines `script`
/// returns. Returning `None`, or a `null` line, closes the connection.
pub fn spawn_backend<F>(path: &Path, mut script: F) -> JoinHandle<Vec<Value>>
where
    F: FnMut(&Value) -> Option<Vec<Value>> + Send + 'static,
{
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();
        let mut seen = Vec::new();

        while let Ok(Some(line)) = lines.next_line().await {
            let call: Value = serde_json::from_str(&line).unwrap();
            seen.push(call.clone());
            match script(&call) {
                Some(out) => {
                    for message in out {
                        if message.is_null() {
                            return seen;
                        }
                        let mut text = message.to_string();
                        text.push('\n');
                        if write.write_all(text.as_bytes()).await.is_err() {
                            return seen;
                        }
                    }
                }
                None => return seen,
            }
        }
        seen
    })
}
