//! Vault command handlers - creating, renaming and deleting vaults.

use super::key_or_slug;
use crate::cli::VaultCommands;
use crate::error::{DeskError, Result};
use crate::rpc::UpdateVaultRequest;
use crate::store::VaultStore;
use crate::ui::prompt;

/// Handle vault subcommands
pub async fn handle_vault(store: &VaultStore, command: VaultCommands) -> Result<()> {
    match command {
        VaultCommands::Add { name, key } => {
            let vault_key = key_or_slug(key, &name, "vault")?;
            store.add_vault(Some(&name), &vault_key).await?;
            store.reload(&vault_key).await?;
            println!("Created vault '{}' ({})", name, vault_key);
        }
        VaultCommands::Rename { vault, name, key } => {
            if name.is_none() && key.is_none() {
                return Err(DeskError::validation("Nothing to change: pass --name and/or --key"));
            }
            let request = UpdateVaultRequest {
                vault_key: vault.clone(),
                new_name: name,
                new_vault_key: key,
            };
            store.client().update_vault(&request).await?;
            // The key may have changed, so refresh everything.
            store.reload_all().await?;
            println!(
                "Updated vault '{}'",
                request.new_vault_key.as_deref().unwrap_or(&vault)
            );
        }
        VaultCommands::Delete { vault } => {
            let message = format!(
                "This permanently deletes vault '{}' and every secret in it.",
                vault
            );
            if !prompt::confirm_typed(&message, &vault)? {
                println!("Cancelled.");
                return Ok(());
            }
            store.client().delete_vault(&vault).await?;
            store.reload_all().await?;
            println!("Deleted vault '{}'", vault);
        }
    }
    Ok(())
}
