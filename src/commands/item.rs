//! Item command handlers - adding, editing and deleting secrets.

use std::collections::BTreeMap;

use super::key_or_slug;
use crate::cli::ItemCommands;
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::keys::ItemKey;
use crate::rpc::{AddItemRequest, CredentialUpdate, UpdateItemRequest, VaultItemSchema};
use crate::store::VaultStore;
use crate::ui::prompt;

/// Handle item subcommands
pub async fn handle_item(config: &Config, store: &VaultStore, command: ItemCommands) -> Result<()> {
    let default_vault = config.default_vault();

    match command {
        ItemCommands::Add { vault, title, key } => {
            let item_key = key_or_slug(key, &title, "item")?;
            let request = AddItemRequest {
                vault_key: vault.clone(),
                item_title: title,
                item_key: item_key.clone(),
            };
            store.client().add_item(&request).await?;
            store.reload(&vault).await?;
            println!("Added {}", ItemKey::new(vault, item_key));
        }
        ItemCommands::Edit {
            reference,
            title,
            credentials,
        } => {
            let key = ItemKey::parse(&reference, default_vault.as_deref())?;
            store.reload(&key.vault_key).await?;
            let item = store
                .get_item(&key)
                .ok_or_else(|| DeskError::not_found(format!("Secret not found: {}", key)))?;

            let renames = parse_renames(&credentials)?;
            let request = edit_request(&key, &item, title, renames)?;
            store.client().update_item(&request).await?;
            store.reload(&key.vault_key).await?;
            println!("Updated {}", key);
        }
        ItemCommands::Delete { reference, yes } => {
            let key = ItemKey::parse(&reference, default_vault.as_deref())?;
            if !yes && !prompt::confirm(&format!("Delete {}?", key))? {
                println!("Cancelled.");
                return Ok(());
            }
            store.client().delete_item(&key.delete_request()).await?;
            store.reload(&key.vault_key).await?;
            println!("Deleted {}", key);
        }
    }
    Ok(())
}

/// Parse repeated `KEY=TITLE` arguments.
fn parse_renames(args: &[String]) -> Result<BTreeMap<String, String>> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, t)| (k.trim().to_string(), t.trim().to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| {
                    DeskError::validation(format!("Expected KEY=TITLE, got '{}'", arg))
                })
        })
        .collect()
}

/// Build an update that changes titles only. Every existing credential is
/// listed without a value so the backend keeps the stored secrets.
fn edit_request(
    key: &ItemKey,
    item: &VaultItemSchema,
    title: Option<String>,
    mut renames: BTreeMap<String, String>,
) -> Result<UpdateItemRequest> {
    let credentials = item
        .credentials
        .iter()
        .map(|(cred_key, cred)| {
            let title = renames.remove(cred_key).or_else(|| cred.title.clone());
            (cred_key.clone(), CredentialUpdate { title, value: None })
        })
        .collect();

    if let Some(unknown) = renames.keys().next() {
        return Err(DeskError::not_found(format!(
            "Credential not found: {}",
            key.credential(unknown.clone())
        )));
    }

    Ok(UpdateItemRequest {
        vault_key: key.vault_key.clone(),
        item_key: key.item_key.clone(),
        item_title: title.unwrap_or_else(|| item.title.clone()),
        credentials,
    })
}
