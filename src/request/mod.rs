//! Password Request Flow for the pinentry and ssh-askpass screens.
//!
//! The backend pushes [`RequestEvent`]s on a named channel. A [`RequestFlow`]
//! holds the one pending request (the newest event always replaces the
//! current one), renders it as a [`Prompt`], and sends exactly one
//! [`PasswordResponse`] per answer. [`run`] wires a flow, its
//! [`Subscription`] and a [`Prompter`] together until the channel closes.
//!
//! [`RequestEvent`]: crate::rpc::RequestEvent
//! [`PasswordResponse`]: crate::rpc::PasswordResponse

mod driver;
mod flow;
mod prompt;
mod subscription;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::rpc::{AskPasswordRequest, Client, GetPinRequest, PasswordResponse};

pub use driver::run;
pub use flow::RequestFlow;
pub use prompt::{FlowView, PasswordPrompt, Prompt, Prompter};
pub use subscription::Subscription;

/// One kind of password request: its event channel, payload type and reply call.
#[async_trait]
pub trait RequestKind: Send + Sync + 'static {
    type Request: DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Push-event channel carrying this kind's requests.
    const EVENT: &'static str;

    /// Send the user's answer to the backend.
    async fn send_response(client: &Client, response: &PasswordResponse) -> Result<()>;

    /// Render a `get_password` request.
    fn password_prompt(request: &Self::Request) -> PasswordPrompt;
}

/// GPG pinentry (`GETPIN`) requests.
pub struct GpgPinentry;

/// SSH askpass requests.
pub struct SshAskpass;

#[async_trait]
impl RequestKind for GpgPinentry {
    type Request = GetPinRequest;

    const EVENT: &'static str = "pinentry-request";

    async fn send_response(client: &Client, response: &PasswordResponse) -> Result<()> {
        client.send_pinentry_response(response).await
    }

    fn password_prompt(request: &GetPinRequest) -> PasswordPrompt {
        let error_message = request.error_message.clone();
        PasswordPrompt {
            title: "GPG Passphrase Required".to_string(),
            details: request
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .into_iter()
                .collect(),
            label: "Enter passphrase for GPG key".to_string(),
            attempting_saved_password: request.base.attempting_saved_password,
            // A saved passphrase that just failed is not offered again.
            offer_saved_password: request.base.has_saved_password && error_message.is_none(),
            offer_save_to_keychain: request.base.key_id.is_some(),
            error_message,
        }
    }
}

#[async_trait]
impl RequestKind for SshAskpass {
    type Request = AskPasswordRequest;

    const EVENT: &'static str = "askpass-request";

    async fn send_response(client: &Client, response: &PasswordResponse) -> Result<()> {
        client.send_askpass_response(response).await
    }

    fn password_prompt(request: &AskPasswordRequest) -> PasswordPrompt {
        PasswordPrompt {
            title: "SSH Passphrase Required".to_string(),
            details: request
                .key_path
                .iter()
                .map(|path| format!("SSH Key: {}", path))
                .collect(),
            label: "Enter passphrase for SSH key".to_string(),
            error_message: None,
            attempting_saved_password: request.base.attempting_saved_password,
            offer_saved_password: request.base.has_saved_password,
            offer_save_to_keychain: request.base.key_id.is_some() || request.key_path.is_some(),
        }
    }
}
