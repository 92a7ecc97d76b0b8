//! Startup decision of which top-level screen to run.
//!
//! The backend is asked once. The answer picks exactly one of the dashboard,
//! the GPG pinentry screen or the SSH askpass screen, for the rest of the
//! process; there is no switching afterwards.

use std::path::PathBuf;

use crate::error::Result;
use crate::request::{GpgPinentry, RequestKind, SshAskpass, Subscription};
use crate::rpc::{AppModeAndState, AskPasswordRequest, GetPinRequest, RequestEvent, VaultInfo};
use crate::store::VaultStore;

/// The resolved top-level screen.
pub enum Screen {
    /// The vault manager, with the vault list already loaded.
    Dashboard {
        helper_bin_path: Option<PathBuf>,
        vaults: Vec<VaultInfo>,
    },
    GpgPinentry {
        initial: Option<RequestEvent<GetPinRequest>>,
        events: Subscription<GetPinRequest>,
    },
    SshAskpass {
        initial: Option<RequestEvent<AskPasswordRequest>>,
        events: Subscription<AskPasswordRequest>,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Dashboard { .. } => "app",
            Screen::GpgPinentry { .. } => "gpg_pinentry",
            Screen::SshAskpass { .. } => "ssh_askpass",
        }
    }
}

/// Resolves the startup mode. Consumed by [`resolve`](Self::resolve), so a
/// process decides its mode once.
pub struct ModeDispatcher<'a> {
    store: &'a VaultStore,
}

impl<'a> ModeDispatcher<'a> {
    pub fn new(store: &'a VaultStore) -> Self {
        Self { store }
    }

    /// Ask the backend for the mode and prepare the matching screen.
    ///
    /// Both request channels are subscribed before the mode is fetched so no
    /// event pushed in between is lost; the one that is not needed is dropped.
    pub async fn resolve(self) -> Result<Screen> {
        let client = self.store.client();
        let pinentry = Subscription::<GetPinRequest>::new(client, GpgPinentry::EVENT);
        let askpass = Subscription::<AskPasswordRequest>::new(client, SshAskpass::EVENT);

        let mode = client.get_mode().await?;

        let screen = match mode {
            AppModeAndState::App { helper_bin_path } => {
                drop(pinentry);
                drop(askpass);
                let vaults = self.store.load_vault_keys().await?;
                Screen::Dashboard {
                    helper_bin_path,
                    vaults,
                }
            }
            AppModeAndState::GpgPinentry(initial) => Screen::GpgPinentry {
                initial,
                events: pinentry,
            },
            AppModeAndState::SshAskpass(initial) => Screen::SshAskpass {
                initial,
                events: askpass,
            },
        };

        tracing::info!(mode = screen.name(), "resolved app mode");
        Ok(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{Client, MemoryTransport};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn store_with(mode: Value) -> (VaultStore, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::new(move |command, _| match command {
            "get_mode" => Ok(mode.clone()),
            "list_vaults" => Ok(json!({"vaults": [{"key": "work"}]})),
            other => Err(format!("unexpected call {}", other)),
        }));
        (VaultStore::new(Client::new(transport.clone())), transport)
    }

    #[tokio::test]
    async fn test_app_mode_loads_vault_keys() {
        let (store, transport) = store_with(json!({"app": {"helper_bin_path": "/opt/bin"}}));

        let screen = ModeDispatcher::new(&store).resolve().await.unwrap();

        match screen {
            Screen::Dashboard {
                helper_bin_path,
                vaults,
            } => {
                assert_eq!(helper_bin_path, Some(PathBuf::from("/opt/bin")));
                assert_eq!(vaults[0].key, "work");
            }
            other => panic!("expected dashboard, got {}", other.name()),
        }
        assert_eq!(transport.call_count("get_mode"), 1);
        assert_eq!(store.vault_keys().len(), 1);
    }

    #[tokio::test]
    async fn test_pinentry_mode_keeps_pending_request_and_skips_store() {
        let (store, transport) = store_with(json!({"gpg_pinentry": {"message": {"description": "hi"}}}));

        let screen = ModeDispatcher::new(&store).resolve().await.unwrap();

        match screen {
            Screen::GpgPinentry { initial, .. } => assert_eq!(
                initial,
                Some(RequestEvent::Message {
                    description: Some("hi".into())
                })
            ),
            other => panic!("expected pinentry, got {}", other.name()),
        }
        assert_eq!(transport.call_count("list_vaults"), 0);
    }

    #[tokio::test]
    async fn test_askpass_mode_receives_later_requests() {
        let (store, transport) = store_with(json!({"ssh_askpass": null}));

        let screen = ModeDispatcher::new(&store).resolve().await.unwrap();
        transport.emit("pinentry-request", json!({"success": "wrong channel"}));
        transport.emit("askpass-request", json!({"success": "ok"}));

        match screen {
            Screen::SshAskpass {
                initial: None,
                mut events,
            } => assert_eq!(events.try_next(), Some(RequestEvent::Success("ok".into()))),
            other => panic!("expected askpass, got {}", other.name()),
        }
    }

    #[tokio::test]
    async fn test_get_mode_error_propagates() {
        let transport = Arc::new(MemoryTransport::new(|_, _| Err("backend exploded".to_string())));
        let store = VaultStore::new(Client::new(transport));

        let err = ModeDispatcher::new(&store).resolve().await.err().unwrap();
        assert_eq!(err.to_string(), "backend exploded");
    }
}
