use std::marker::PhantomData;

use super::prompt::{FlowView, Prompt};
use super::subscription::Subscription;
use super::RequestKind;
use crate::error::Result;
use crate::rpc::{Client, PasswordResponse, RequestEvent};

/// The pending request of one pinentry/askpass screen.
pub struct RequestFlow<K: RequestKind> {
    client: Client,
    pending: Option<RequestEvent<K::Request>>,
    /// Bumped on every change of `pending`, so a stale answer can be detected.
    generation: u64,
    _kind: PhantomData<K>,
}

impl<K: RequestKind> RequestFlow<K> {
    /// Start with the request that was pending when the mode was resolved, if any.
    pub fn new(client: Client, initial: Option<RequestEvent<K::Request>>) -> Self {
        Self {
            client,
            pending: initial,
            generation: 0,
            _kind: PhantomData,
        }
    }

    /// Subscribe to this kind's request channel.
    pub fn subscribe(&self) -> Subscription<K::Request> {
        Subscription::new(&self.client, K::EVENT)
    }

    pub fn pending(&self) -> Option<&RequestEvent<K::Request>> {
        self.pending.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A pushed event replaces whatever is pending.
    pub fn apply_event(&mut self, event: RequestEvent<K::Request>) {
        tracing::debug!(channel = K::EVENT, ?event, "request event");
        self.pending = Some(event);
        self.generation += 1;
    }

    fn clear(&mut self) {
        self.pending = None;
        self.generation += 1;
    }

    pub fn view(&self) -> FlowView {
        match &self.pending {
            None => FlowView::Waiting,
            Some(RequestEvent::Success(_)) => FlowView::Verifying,
            Some(RequestEvent::GetPassword(request)) => {
                let prompt = K::password_prompt(request);
                if prompt.attempting_saved_password {
                    FlowView::Authenticating(prompt)
                } else {
                    FlowView::Prompt(Prompt::Password(prompt))
                }
            }
            Some(RequestEvent::Confirm { description }) => FlowView::Prompt(Prompt::Confirm {
                description: description.clone(),
            }),
            Some(RequestEvent::Message { description }) => FlowView::Prompt(Prompt::Message {
                description: description.clone(),
            }),
        }
    }

    /// Send one answer to the backend.
    ///
    /// On success the pending request is cleared. On failure the error is
    /// logged and returned and the request stays pending so the user can
    /// answer again, except for `cancelled`, which always clears it.
    pub async fn submit(&mut self, response: PasswordResponse) -> Result<()> {
        let result = K::send_response(&self.client, &response).await;

        match &result {
            Ok(()) => self.clear(),
            Err(e) => {
                tracing::error!(channel = K::EVENT, error = %e, "error sending response");
                if response == PasswordResponse::Cancelled {
                    self.clear();
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{GpgPinentry, SshAskpass};
    use crate::rpc::{AskPasswordRequest, GetPinRequest, MemoryTransport, PasswordRequestData};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn failing_client() -> (Client, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::new(|_, _| {
            Err("pinentry is not waiting for a response".to_string())
        }));
        (Client::new(transport.clone()), transport)
    }

    fn ok_client() -> (Client, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::new(|_, _| Ok(Value::Null)));
        (Client::new(transport.clone()), transport)
    }

    fn get_password() -> RequestEvent<GetPinRequest> {
        RequestEvent::GetPassword(GetPinRequest {
            base: PasswordRequestData {
                key_id: Some("ABCD".into()),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_latest_event_replaces_pending() {
        let (client, _) = ok_client();
        let mut flow = RequestFlow::<GpgPinentry>::new(client, None);
        assert_eq!(flow.view(), FlowView::Waiting);

        flow.apply_event(get_password());
        flow.apply_event(RequestEvent::Confirm {
            description: Some("Trust?".into()),
        });

        assert_eq!(
            flow.view(),
            FlowView::Prompt(Prompt::Confirm {
                description: Some("Trust?".into())
            })
        );
        assert_eq!(flow.generation(), 2);
    }

    #[test]
    fn test_success_passphrase_stays_out_of_logs() {
        let (client, _) = ok_client();
        let mut flow = RequestFlow::<GpgPinentry>::new(client, None);
        let (logs, subscriber) = crate::ui::test_support::capture_logs();

        tracing::subscriber::with_default(subscriber, || {
            flow.apply_event(RequestEvent::Success("correct horse battery".into()));
        });

        let logs = logs.contents();
        assert!(logs.contains("request event"));
        assert!(logs.contains("<redacted>"));
        assert!(!logs.contains("correct horse battery"));
    }

    #[test]
    fn test_views_for_each_event() {
        let (client, _) = ok_client();
        let mut flow = RequestFlow::<SshAskpass>::new(client, Some(RequestEvent::Success("ok".into())));
        assert_eq!(flow.view(), FlowView::Verifying);

        flow.apply_event(RequestEvent::GetPassword(AskPasswordRequest {
            base: PasswordRequestData {
                attempting_saved_password: true,
                ..Default::default()
            },
            ..Default::default()
        }));
        assert!(matches!(flow.view(), FlowView::Authenticating(_)));

        flow.apply_event(RequestEvent::Message { description: None });
        assert_eq!(
            flow.view(),
            FlowView::Prompt(Prompt::Message { description: None })
        );
    }

    #[tokio::test]
    async fn test_successful_submit_clears() {
        let (client, transport) = ok_client();
        let mut flow = RequestFlow::<GpgPinentry>::new(client, Some(get_password()));

        flow.submit(PasswordResponse::Password {
            value: "hunter2".into(),
            save_to_keychain: true,
        })
        .await
        .unwrap();

        assert!(flow.pending().is_none());
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, "send_pinentry_response");
        assert_eq!(
            calls[0].args,
            json!({"response": {"password": {"value": "hunter2", "save_to_keychain": true}}})
        );
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_request_pending() {
        let (client, transport) = failing_client();
        let mut flow = RequestFlow::<GpgPinentry>::new(client, Some(get_password()));

        assert!(flow.submit(PasswordResponse::UseSavedPassword).await.is_err());
        assert_eq!(flow.pending(), Some(&get_password()));
        assert_eq!(transport.call_count("send_pinentry_response"), 1);
    }

    #[tokio::test]
    async fn test_cancel_always_clears() {
        let (client, transport) = failing_client();
        let mut flow = RequestFlow::<SshAskpass>::new(
            client,
            Some(RequestEvent::Confirm { description: None }),
        );

        assert!(flow.submit(PasswordResponse::Cancelled).await.is_err());
        assert!(flow.pending().is_none());
        assert_eq!(transport.call_count("send_askpass_response"), 1);
        assert_eq!(transport.calls()[0].args, json!({"response": "cancelled"}));
    }
}
