//! Typed payloads exchanged with the backend.
//!
//! These mirror the backend's schemas one to one. Closed unions (app mode,
//! request events, password responses, update status) are Rust enums so
//! callers match on them exhaustively instead of probing for keys.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ── Vaults ─────────────────────────────────────────────────────────────

/// Identity and optional display name of a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultInfo {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl VaultInfo {
    /// The name shown to the user: `name` when set, otherwise `key`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListVaultsResponse {
    pub vaults: Vec<VaultInfo>,
}

/// Full contents of one vault as last fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultSchema {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub data: BTreeMap<String, VaultItemSchema>,
}

impl VaultSchema {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// One secret entry within a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultItemSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub credentials: BTreeMap<String, VaultItemCredentialSchema>,
}

/// Credential metadata. The secret value never travels with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultItemCredentialSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultResponse {
    pub vault: VaultSchema,
}

/// A decrypted secret value, fetched on demand and never cached.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DecryptedCredential {
    pub secret: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// Keep plaintext out of debug logs.
impl std::fmt::Debug for DecryptedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedCredential")
            .field("secret", &"<redacted>")
            .field("title", &self.title)
            .field("url", &self.url)
            .finish()
    }
}

// ── Vault mutation requests ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVaultRequest {
    pub vault_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVaultRequest {
    pub vault_name: Option<String>,
    pub vault_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVaultRequest {
    pub vault_key: String,
    pub new_name: Option<String>,
    pub new_vault_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteVaultRequest {
    pub vault_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub vault_key: String,
    pub item_title: String,
    pub item_key: String,
}

/// Per-credential change in an item update. `value: None` keeps the secret.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialUpdate {
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl std::fmt::Debug for CredentialUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialUpdate")
            .field("title", &self.title)
            .field("value", &self.value.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub vault_key: String,
    pub item_key: String,
    pub item_title: String,
    pub credentials: BTreeMap<String, CredentialUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteItemRequest {
    pub vault_key: String,
    pub item_key: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AddCredentialRequest {
    pub vault_key: String,
    pub item_key: String,
    pub credential_title: String,
    pub credential_key: String,
    pub credential_value: String,
}

impl std::fmt::Debug for AddCredentialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddCredentialRequest")
            .field("vault_key", &self.vault_key)
            .field("item_key", &self.item_key)
            .field("credential_title", &self.credential_title)
            .field("credential_key", &self.credential_key)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCredentialRequest {
    pub vault_key: String,
    pub item_key: String,
    pub credential_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptedCredentialRequest {
    pub vault_key: String,
    pub item_key: String,
    pub credential_key: String,
}

// ── Saved keychain passwords ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordEntryType {
    GpgKey,
    SshKey,
    Other,
}

impl PasswordEntryType {
    pub fn label(&self) -> &'static str {
        match self {
            PasswordEntryType::GpgKey => "gpg",
            PasswordEntryType::SshKey => "ssh",
            PasswordEntryType::Other => "other",
        }
    }
}

/// A passphrase the backend saved in the OS keychain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordEntry {
    pub password_type: PasswordEntryType,
    pub key_id: String,
}

// ── Password requests (pinentry / ssh-askpass) ─────────────────────────

/// Fields shared by every password request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRequestData {
    #[serde(default)]
    pub key_id: Option<String>,
    #[serde(default)]
    pub has_saved_password: bool,
    #[serde(default)]
    pub attempting_saved_password: bool,
}

/// A GPG pinentry `GETPIN` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPinRequest {
    #[serde(flatten)]
    pub base: PasswordRequestData,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// An SSH askpass request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskPasswordRequest {
    #[serde(flatten)]
    pub base: PasswordRequestData,
    #[serde(default)]
    pub key_path: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// One pending prompt pushed by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestEvent<R> {
    /// Ask the user for a password
    GetPassword(R),
    /// The password was handed over; the backend may still reject it
    Success(String),
    /// Yes/no question
    Confirm { description: Option<String> },
    /// Informational message with a single acknowledgement
    Message { description: Option<String> },
}

// `Success` carries the passphrase that was handed over.
impl<R: std::fmt::Debug> std::fmt::Debug for RequestEvent<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestEvent::GetPassword(request) => f.debug_tuple("GetPassword").field(request).finish(),
            RequestEvent::Success(_) => f.debug_tuple("Success").field(&"<redacted>").finish(),
            RequestEvent::Confirm { description } => f
                .debug_struct("Confirm")
                .field("description", description)
                .finish(),
            RequestEvent::Message { description } => f
                .debug_struct("Message")
                .field("description", description)
                .finish(),
        }
    }
}

/// The only answers the front-end may send to a pending request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordResponse {
    UseSavedPassword,
    Confirmed,
    Cancelled,
    Password { value: String, save_to_keychain: bool },
}

impl std::fmt::Debug for PasswordResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordResponse::UseSavedPassword => write!(f, "UseSavedPassword"),
            PasswordResponse::Confirmed => write!(f, "Confirmed"),
            PasswordResponse::Cancelled => write!(f, "Cancelled"),
            PasswordResponse::Password {
                save_to_keychain, ..
            } => f
                .debug_struct("Password")
                .field("value", &"<redacted>")
                .field("save_to_keychain", save_to_keychain)
                .finish(),
        }
    }
}

// ── App mode ───────────────────────────────────────────────────────────

/// Which screen the front-end must show, plus any request already pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppModeAndState {
    App {
        #[serde(default)]
        helper_bin_path: Option<PathBuf>,
    },
    GpgPinentry(Option<RequestEvent<GetPinRequest>>),
    SshAskpass(Option<RequestEvent<AskPasswordRequest>>),
}

// ── Settings & updates ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettingsResponse {
    #[serde(default)]
    pub helper_bin_path: Option<String>,
    #[serde(default)]
    pub vaults_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum UpdateStatusResponse {
    UpdateAvailable {
        version: String,
        checked_at_rfc3339: String,
    },
    UpToDate {
        version: String,
        checked_at_rfc3339: String,
    },
    Error {
        error: String,
        checked_at_rfc3339: String,
    },
    NotChecked,
}

impl UpdateStatusResponse {
    /// When the last check ran, if there was one.
    pub fn checked_at(&self) -> Option<&str> {
        match self {
            UpdateStatusResponse::UpdateAvailable {
                checked_at_rfc3339, ..
            }
            | UpdateStatusResponse::UpToDate {
                checked_at_rfc3339, ..
            }
            | UpdateStatusResponse::Error {
                checked_at_rfc3339, ..
            } => Some(checked_at_rfc3339),
            UpdateStatusResponse::NotChecked => None,
        }
    }
}
