//! Secret listings and credential reveal.

use std::io::{self, Write};

use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::keys::CredentialKey;
use crate::store::VaultStore;
use crate::ui::{ErrorDialog, HiddenSecretValue, lists};

/// Handle the secrets command.
///
/// With no `--vault` every vault is selected. Each selected vault is
/// reloaded first; one that fails to load is reported and skipped.
pub async fn handle_secrets(
    config: &Config,
    store: &VaultStore,
    errors: &ErrorDialog,
    vaults: Vec<String>,
    combined: bool,
) -> Result<()> {
    let selected = if vaults.is_empty() {
        store
            .load_vault_keys()
            .await?
            .into_iter()
            .map(|info| info.key)
            .collect()
    } else {
        vaults
    };

    for vault_key in &selected {
        if let Err(e) = store.reload(vault_key).await {
            errors.show_error(Some(&format!("Error loading vault '{}'", vault_key)), e);
        }
    }
    if store.vault_keys().is_empty() {
        // Names for the group headers.
        store.load_vault_keys().await?;
    }

    let mut out = io::stdout().lock();
    if combined {
        lists::render_combined(&lists::combined(store, &selected), &mut out, config.show_refs())?;
    } else {
        lists::render_grouped(&lists::grouped(store, &selected), &mut out)?;
    }
    out.flush()?;
    Ok(())
}

/// Handle the reveal command
pub async fn handle_reveal(
    config: &Config,
    store: &VaultStore,
    errors: &ErrorDialog,
    reference: &str,
) -> Result<()> {
    let key = CredentialKey::parse(reference, config.default_vault().as_deref())?;

    // The vault is loaded only to give a helpful error for unknown references.
    let vault_loaded = store.reload(&key.vault_key).await.is_ok();
    if vault_loaded && store.get_credential(&key).is_none() {
        return Err(DeskError::not_found(format!("Credential not found: {}", key)));
    }

    let mut value = HiddenSecretValue::new(key);
    if !value.reveal(store.client(), errors).await {
        // Already shown by the error dialog.
        return Ok(());
    }

    let mut out = io::stdout().lock();
    writeln!(out, "{}", value.display())?;
    if let Some(url) = value.url() {
        writeln!(out, "url: {}", url)?;
    }
    out.flush()?;
    value.hide();
    Ok(())
}
