//! Credential command handlers.

use super::key_or_slug;
use crate::cli::CredentialCommands;
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::keys::{CredentialKey, ItemKey};
use crate::rpc::AddCredentialRequest;
use crate::store::VaultStore;
use crate::ui::prompt;

/// Handle credential subcommands
pub async fn handle_credential(
    config: &Config,
    store: &VaultStore,
    command: CredentialCommands,
) -> Result<()> {
    let default_vault = config.default_vault();

    match command {
        CredentialCommands::Add {
            reference,
            title,
            key,
        } => {
            let item = ItemKey::parse(&reference, default_vault.as_deref())?;
            let credential_key = key_or_slug(key, &title, "credential")?;

            let value = prompt::prompt_secret(&format!("Value for '{}'", title))?;
            if value.is_empty() {
                return Err(DeskError::validation("Credential value cannot be empty"));
            }

            let request = AddCredentialRequest {
                vault_key: item.vault_key.clone(),
                item_key: item.item_key.clone(),
                credential_title: title,
                credential_key: credential_key.clone(),
                credential_value: value,
            };
            store.client().add_credential(&request).await?;
            store.reload(&item.vault_key).await?;
            println!("Added {}", item.credential(credential_key));
        }
        CredentialCommands::Delete { reference, yes } => {
            let key = CredentialKey::parse(&reference, default_vault.as_deref())?;
            if !yes && !prompt::confirm(&format!("Delete {}?", key))? {
                println!("Cancelled.");
                return Ok(());
            }
            store.client().delete_credential(&key.delete_request()).await?;
            store.reload(&key.vault_key).await?;
            println!("Deleted {}", key);
        }
    }
    Ok(())
}
