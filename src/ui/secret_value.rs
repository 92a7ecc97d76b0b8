use crate::keys::CredentialKey;
use crate::rpc::{Client, DecryptedCredential};
use crate::ui::ErrorDialog;

const MASK: &str = "••••••••";

/// A credential value that is masked until revealed.
///
/// The plaintext lives only inside this value while it is revealed. Hiding
/// drops it, and every reveal asks the backend again.
pub struct HiddenSecretValue {
    key: CredentialKey,
    revealed: Option<DecryptedCredential>,
}

impl HiddenSecretValue {
    pub fn new(key: CredentialKey) -> Self {
        Self {
            key,
            revealed: None,
        }
    }

    pub fn key(&self) -> &CredentialKey {
        &self.key
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed.is_some()
    }

    /// Decrypt and show the value. Failures go to the error dialog and
    /// leave the value hidden.
    pub async fn reveal(&mut self, client: &Client, errors: &ErrorDialog) -> bool {
        match client.get_decrypted_credential(&self.key.decrypt_request()).await {
            Ok(Some(credential)) => {
                self.revealed = Some(credential);
                true
            }
            Ok(None) => {
                errors.show_error(None, format!("No value stored for {}", self.key));
                false
            }
            Err(e) => {
                errors.show_error(None, format!("Failed to decrypt credential: {}", e));
                false
            }
        }
    }

    pub fn hide(&mut self) {
        self.revealed = None;
    }

    /// Reveal when hidden, hide when revealed. Returns whether it is now revealed.
    pub async fn toggle(&mut self, client: &Client, errors: &ErrorDialog) -> bool {
        if self.is_revealed() {
            self.hide();
            false
        } else {
            self.reveal(client, errors).await
        }
    }

    /// The plaintext if revealed, the mask otherwise.
    pub fn display(&self) -> &str {
        match &self.revealed {
            Some(credential) => &credential.secret,
            None => MASK,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.revealed.as_ref()?.url.as_deref()
    }
}
