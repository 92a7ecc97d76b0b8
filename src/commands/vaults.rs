//! Vault listing and single-vault view.

use std::io::{self, Write};

use super::default::render_vault_list;
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::store::VaultStore;
use crate::ui::{ErrorDialog, VaultView, prompt};

/// Handle the vaults command
pub async fn handle_vaults(store: &VaultStore) -> Result<()> {
    let vaults = store.load_vault_keys().await?;
    render_vault_list(&vaults, &mut io::stdout().lock())?;
    Ok(())
}

/// Handle the show command.
///
/// A vault the backend reports as missing can be created on the spot;
/// other load failures go to the error dialog.
pub async fn handle_show(
    config: &Config,
    store: &VaultStore,
    errors: &ErrorDialog,
    vault: Option<String>,
) -> Result<()> {
    let vault_key = vault
        .or_else(|| config.default_vault())
        .ok_or_else(|| DeskError::validation("No vault given and no default vault configured"))?;

    let view = VaultView::load(store, &vault_key).await;
    match &view {
        VaultView::Loaded(_) => view.render(&mut io::stdout().lock())?,
        VaultView::Missing { .. } => {
            view.render(&mut io::stderr().lock())?;
            if prompt::confirm(&format!("Create vault '{}' now?", vault_key))? {
                store.add_vault(None, &vault_key).await?;
                VaultView::load(store, &vault_key)
                    .await
                    .render(&mut io::stdout().lock())?;
            }
        }
        VaultView::Failed { vault_key, message } => {
            errors.show_error(
                Some(&format!("Error loading vault '{}'", vault_key)),
                message,
            );
        }
    }
    io::stdout().flush()?;
    Ok(())
}
