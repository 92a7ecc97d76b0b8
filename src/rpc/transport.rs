//! Backend channel implementations.
//!
//! [`Transport`] is the seam between the typed [`Client`](super::Client) and
//! whatever carries the calls. [`SocketTransport`] talks to a backend process
//! over a Unix socket; [`MemoryTransport`] answers calls in-process from a
//! handler closure, which is what the test suite and embedders use.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use super::protocol::{Call, Event, Incoming, Reply, decode_line, encode_line};
use crate::error::{DeskError, Result};

/// How many undelivered events a slow subscriber may fall behind by.
const EVENT_BUFFER: usize = 16;

/// Payloads of one named event channel, in arrival order.
///
/// The stream ends when the backend goes away. Dropping it unsubscribes.
pub type EventStream = BoxStream<'static, Value>;

/// A request/reply channel to the backend plus its push events.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one call and wait for its single reply.
    async fn invoke(&self, command: &str, args: Value) -> Result<Value>;

    /// Subscribe to the payloads of the named event.
    fn subscribe(&self, event: &str) -> EventStream;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn filter_events(rx: broadcast::Receiver<Event>, name: &str) -> EventStream {
    let name = name.to_string();
    BroadcastStream::new(rx)
        .filter_map(move |item| {
            let payload = match item {
                Ok(event) if event.event == name => Some(event.payload),
                Ok(_) => None,
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(event = %name, skipped, "event subscriber lagged");
                    None
                }
            };
            futures::future::ready(payload)
        })
        .boxed()
}

fn subscribe_to(events: &Mutex<Option<broadcast::Sender<Event>>>, name: &str) -> EventStream {
    let rx = match lock(events).as_ref() {
        Some(tx) => tx.subscribe(),
        None => {
            // Already closed: hand back a stream that ends immediately.
            let (tx, rx) = broadcast::channel(1);
            drop(tx);
            rx
        }
    };
    filter_events(rx, name)
}

type PendingCalls = Arc<Mutex<HashMap<u64, oneshot::Sender<Reply>>>>;
type EventSender = Arc<Mutex<Option<broadcast::Sender<Event>>>>;

// ── Unix socket ────────────────────────────────────────────────────────

/// Newline-delimited JSON over a Unix socket.
///
/// A background task reads the socket, routes replies to their waiting
/// calls by id and fans events out to subscribers.
pub struct SocketTransport {
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: PendingCalls,
    events: EventSender,
    closed: Arc<AtomicBool>,
    next_id: AtomicU64,
    timeout: Duration,
    reader: JoinHandle<()>,
}

impl SocketTransport {
    /// Connect to the backend socket at `path`.
    pub async fn connect(path: &Path, timeout: Duration) -> Result<Self> {
        let stream = UnixStream::connect(path).await.map_err(|e| {
            DeskError::transport(format!(
                "failed to connect to backend at {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(socket = %path.display(), "connected to backend");
        Ok(Self::from_stream(stream, timeout))
    }

    /// Wrap an already connected stream. Must be called inside a tokio runtime.
    pub fn from_stream(stream: UnixStream, timeout: Duration) -> Self {
        let (read_half, write_half) = stream.into_split();
        let pending: PendingCalls = Arc::new(Mutex::new(HashMap::new()));
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        let events: EventSender = Arc::new(Mutex::new(Some(tx)));
        let closed = Arc::new(AtomicBool::new(false));

        let reader = tokio::spawn(read_loop(
            read_half,
            Arc::clone(&pending),
            Arc::clone(&events),
            Arc::clone(&closed),
        ));

        Self {
            writer: tokio::sync::Mutex::new(write_half),
            pending,
            events,
            closed,
            next_id: AtomicU64::new(1),
            timeout,
            reader,
        }
    }

    /// Whether the backend has closed the connection.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Drop for SocketTransport {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(
    read_half: OwnedReadHalf,
    pending: PendingCalls,
    events: EventSender,
    closed: Arc<AtomicBool>,
) {
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                tracing::debug!("backend closed the connection");
                break;
            }
            Ok(_) => {
                if line.trim().is_empty() {
                    continue;
                }
                match decode_line(&line) {
                    Ok(Incoming::Reply(reply)) => {
                        let waiter = lock(&pending).remove(&reply.id);
                        match waiter {
                            Some(tx) => {
                                let _ = tx.send(reply);
                            }
                            None => tracing::warn!(id = reply.id, "reply for unknown call"),
                        }
                    }
                    Ok(Incoming::Event(event)) => {
                        tracing::debug!(event = %event.event, "backend event");
                        if let Some(tx) = lock(&events).as_ref() {
                            // No subscribers is fine; nobody is showing that screen.
                            let _ = tx.send(event);
                        }
                    }
                    // Only the category: the error text can quote secret values.
                    Err(DeskError::Json(e)) => tracing::warn!(
                        category = ?e.classify(),
                        line_len = line.len(),
                        "malformed message from backend"
                    ),
                    Err(e) => tracing::warn!(error = %e, "malformed message from backend"),
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "backend read error");
                break;
            }
        }
    }

    closed.store(true, Ordering::Release);
    // Dropping the senders fails every in-flight call and ends every subscription.
    lock(&pending).clear();
    lock(&events).take();
}

#[async_trait]
impl Transport for SocketTransport {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value> {
        if self.is_closed() {
            return Err(DeskError::transport("backend connection closed"));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let line = encode_line(&Call::new(id, command, args))?;

        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(id, tx);

        {
            let mut writer = self.writer.lock().await;
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                lock(&self.pending).remove(&id);
                return Err(DeskError::transport(format!(
                    "failed to send '{}': {}",
                    command, e
                )));
            }
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(reply)) => reply.into_result(),
            Ok(Err(_)) => Err(DeskError::transport("backend connection closed")),
            Err(_) => {
                lock(&self.pending).remove(&id);
                Err(DeskError::transport(format!(
                    "'{}' timed out after {}s",
                    command,
                    self.timeout.as_secs()
                )))
            }
        }
    }

    fn subscribe(&self, event: &str) -> EventStream {
        subscribe_to(&self.events, event)
    }
}

// ── In-process ─────────────────────────────────────────────────────────

type Handler = dyn Fn(&str, &Value) -> std::result::Result<Value, String> + Send + Sync;

/// Answers calls in-process from a handler closure.
///
/// The handler receives the command name and its arguments and returns the
/// result or the backend's error message. Every call is recorded, and events
/// are pushed with [`emit`](Self::emit).
pub struct MemoryTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<Call>>,
    events: Mutex<Option<broadcast::Sender<Event>>>,
    next_id: AtomicU64,
}

impl MemoryTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
            events: Mutex::new(Some(tx)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Push an event to current subscribers. Returns how many received it.
    pub fn emit(&self, event: &str, payload: Value) -> usize {
        match lock(&self.events).as_ref() {
            Some(tx) => tx.send(Event::new(event, payload)).unwrap_or(0),
            None => 0,
        }
    }

    /// Simulate the backend going away: every subscription ends.
    pub fn close(&self) {
        lock(&self.events).take();
    }

    /// Every call issued so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// How many times `command` was called.
    pub fn call_count(&self, command: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.command == command)
            .count()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let result = (self.handler)(command, &args);
        lock(&self.calls).push(Call::new(id, command, args));
        result.map_err(DeskError::backend)
    }

    fn subscribe(&self, event: &str) -> EventStream {
        subscribe_to(&self.events, event)
    }
}
