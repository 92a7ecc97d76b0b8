//! Typed wrapper around the backend's named calls.
//!
//! Every method is exactly one round trip. A failed call is returned to the
//! caller once; nothing is retried here.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::transport::{EventStream, Transport};
use super::types::*;
use crate::error::Result;

#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Invoke `command` and decode its result as `T`.
    pub async fn call<T: DeserializeOwned>(&self, command: &str, args: Value) -> Result<T> {
        tracing::debug!(command, "backend call");
        let value = self.transport.invoke(command, args).await.inspect_err(|e| {
            tracing::debug!(command, error = %e, "backend call failed");
        })?;
        Ok(serde_json::from_value(value)?)
    }

    /// Invoke `command` for its side effect. Whatever it returns is ignored.
    pub async fn call_unit(&self, command: &str, args: Value) -> Result<()> {
        let _: Value = self.call(command, args).await?;
        Ok(())
    }

    async fn send<R: Serialize>(&self, command: &str, request: &R) -> Result<()> {
        self.call_unit(command, serde_json::to_value(request)?).await
    }

    /// Subscribe to a push-event channel.
    pub fn subscribe(&self, event: &str) -> EventStream {
        self.transport.subscribe(event)
    }

    // ── Vaults ─────────────────────────────────────────────────────────

    pub async fn list_vaults(&self) -> Result<Vec<VaultInfo>> {
        let response: ListVaultsResponse = self.call("list_vaults", json!({})).await?;
        Ok(response.vaults)
    }

    /// Fetch one vault. `None` asks for the backend's default vault.
    pub async fn get_vault(&self, vault_key: Option<&str>) -> Result<VaultResponse> {
        let request = GetVaultRequest {
            vault_key: vault_key.map(str::to_string),
        };
        self.call("get_vault", serde_json::to_value(&request)?).await
    }

    pub async fn add_vault(&self, request: &AddVaultRequest) -> Result<()> {
        self.send("add_vault", request).await
    }

    pub async fn update_vault(&self, request: &UpdateVaultRequest) -> Result<()> {
        self.send("update_vault", request).await
    }

    pub async fn delete_vault(&self, vault_key: &str) -> Result<()> {
        self.send(
            "delete_vault",
            &DeleteVaultRequest {
                vault_key: vault_key.to_string(),
            },
        )
        .await
    }

    // ── Items & credentials ────────────────────────────────────────────

    pub async fn add_item(&self, request: &AddItemRequest) -> Result<()> {
        self.send("add_item", request).await
    }

    pub async fn update_item(&self, request: &UpdateItemRequest) -> Result<()> {
        self.send("update_item", request).await
    }

    pub async fn delete_item(&self, request: &DeleteItemRequest) -> Result<()> {
        self.send("delete_item", request).await
    }

    pub async fn add_credential(&self, request: &AddCredentialRequest) -> Result<()> {
        self.send("add_credential", request).await
    }

    pub async fn delete_credential(&self, request: &DeleteCredentialRequest) -> Result<()> {
        self.send("delete_credential", request).await
    }

    /// Decrypt a single credential. `None` when the backend has nothing for it.
    pub async fn get_decrypted_credential(
        &self,
        request: &DecryptedCredentialRequest,
    ) -> Result<Option<DecryptedCredential>> {
        self.call("get_decrypted_credential", serde_json::to_value(request)?)
            .await
    }

    // ── Saved keychain passwords ───────────────────────────────────────

    pub async fn list_passwords(&self) -> Result<Vec<PasswordEntry>> {
        self.call("list_passwords", json!({})).await
    }

    pub async fn delete_password(&self, entry: &PasswordEntry) -> Result<()> {
        self.call_unit("delete_password", json!({ "entry": entry }))
            .await
    }

    // ── Mode & password requests ───────────────────────────────────────

    pub async fn get_mode(&self) -> Result<AppModeAndState> {
        self.call("get_mode", json!({})).await
    }

    pub async fn send_pinentry_response(&self, response: &PasswordResponse) -> Result<()> {
        self.call_unit("send_pinentry_response", json!({ "response": response }))
            .await
    }

    pub async fn send_askpass_response(&self, response: &PasswordResponse) -> Result<()> {
        self.call_unit("send_askpass_response", json!({ "response": response }))
            .await
    }

    // ── Settings & updates ─────────────────────────────────────────────

    pub async fn get_app_settings(&self) -> Result<AppSettingsResponse> {
        self.call("get_app_settings", json!({})).await
    }

    pub async fn get_update_status(&self) -> Result<UpdateStatusResponse> {
        self.call("get_update_status", json!({})).await
    }

    pub async fn check_updates(&self) -> Result<UpdateStatusResponse> {
        self.call("check_updates", json!({})).await
    }

    pub async fn get_update_check_disabled(&self) -> Result<bool> {
        self.call("get_update_check_disabled", json!({})).await
    }

    /// Returns the setting as stored by the backend.
    pub async fn set_update_check_disabled(&self, disabled: bool) -> Result<bool> {
        self.call("set_update_check_disabled", json!({ "disabled": disabled }))
            .await
    }

    pub async fn gpg_test_integration(&self) -> Result<()> {
        self.call_unit("gpg_test_integration", json!({})).await
    }
}
