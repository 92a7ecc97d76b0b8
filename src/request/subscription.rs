use std::marker::PhantomData;

use futures::stream::Fuse;
use futures::{FutureExt, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::rpc::{Client, EventStream, RequestEvent};

/// Typed subscription to one request channel.
///
/// Payloads that do not decode are logged and skipped. Dropping the
/// subscription unsubscribes.
pub struct Subscription<R> {
    channel: String,
    stream: Fuse<EventStream>,
    _request: PhantomData<fn() -> R>,
}

impl<R: DeserializeOwned> Subscription<R> {
    pub fn new(client: &Client, channel: &str) -> Self {
        tracing::debug!(channel, "subscribed");
        Self {
            channel: channel.to_string(),
            stream: client.subscribe(channel).fuse(),
            _request: PhantomData,
        }
    }

    fn decode(&self, payload: Value) -> Option<RequestEvent<R>> {
        match serde_json::from_value(payload) {
            Ok(event) => Some(event),
            Err(e) => {
                // The error text can quote payload strings, which may be passphrases.
                tracing::warn!(
                    channel = %self.channel,
                    category = ?e.classify(),
                    "ignoring malformed request event"
                );
                None
            }
        }
    }

    /// Wait for the next event. `None` once the backend has gone away.
    pub async fn next(&mut self) -> Option<RequestEvent<R>> {
        while let Some(payload) = self.stream.next().await {
            if let Some(event) = self.decode(payload) {
                return Some(event);
            }
        }
        None
    }

    /// An event that has already arrived, without waiting.
    pub fn try_next(&mut self) -> Option<RequestEvent<R>> {
        while let Some(Some(payload)) = self.stream.next().now_or_never() {
            if let Some(event) = self.decode(payload) {
                return Some(event);
            }
        }
        None
    }

    /// Drain everything already queued, keeping only the newest event.
    pub fn latest_queued(&mut self) -> Option<RequestEvent<R>> {
        let mut latest = None;
        while let Some(event) = self.try_next() {
            latest = Some(event);
        }
        latest
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_done()
    }
}

impl<R> Drop for Subscription<R> {
    fn drop(&mut self) {
        tracing::debug!(channel = %self.channel, "unsubscribed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{GetPinRequest, MemoryTransport};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_skips_malformed_and_keeps_latest() {
        let transport = Arc::new(MemoryTransport::new(|_, _| Ok(Value::Null)));
        let client = Client::new(transport.clone());
        let mut sub = Subscription::<GetPinRequest>::new(&client, "pinentry-request");

        transport.emit("pinentry-request", json!({"success": "first"}));
        transport.emit("pinentry-request", json!({"bogus": 1}));
        transport.emit("pinentry-request", json!({"message": {"description": "last"}}));

        assert_eq!(
            sub.latest_queued(),
            Some(RequestEvent::Message {
                description: Some("last".into())
            })
        );
        assert!(sub.try_next().is_none());
    }

    #[tokio::test]
    async fn test_malformed_payload_text_is_not_logged() {
        let transport = Arc::new(MemoryTransport::new(|_, _| Ok(Value::Null)));
        let client = Client::new(transport.clone());
        let mut sub = Subscription::<GetPinRequest>::new(&client, "pinentry-request");
        let (logs, subscriber) = crate::ui::test_support::capture_logs();
        let _guard = tracing::subscriber::set_default(subscriber);

        transport.emit("pinentry-request", json!({"get_password": "hunter2"}));
        assert!(sub.try_next().is_none());

        let logs = logs.contents();
        assert!(logs.contains("ignoring malformed request event"));
        assert!(logs.contains("Data"));
        assert!(!logs.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_ends_when_backend_goes_away() {
        let transport = Arc::new(MemoryTransport::new(|_, _| Ok(Value::Null)));
        let client = Client::new(transport.clone());
        let mut sub = Subscription::<GetPinRequest>::new(&client, "pinentry-request");

        transport.close();
        assert!(sub.next().await.is_none());
        assert!(sub.is_closed());
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let transport = Arc::new(MemoryTransport::new(|_, _| Ok(Value::Null)));
        let client = Client::new(transport.clone());

        let sub = Subscription::<GetPinRequest>::new(&client, "pinentry-request");
        assert_eq!(transport.emit("pinentry-request", json!({"success": "x"})), 1);
        drop(sub);
        assert_eq!(transport.emit("pinentry-request", json!({"success": "x"})), 0);
    }
}
