//! Secret listings across the selected vaults.
//!
//! Both lists are built from [`VaultStore::list_secrets_for_selected_vaults`]:
//! the grouped list shows one section per vault with its items, the combined
//! list flattens every item into its credentials.

use std::io::{self, Write};

use crate::keys::{CredentialKey, ItemKey};
use crate::store::VaultStore;

/// One vault's section of the grouped list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretGroup {
    pub vault_key: String,
    pub vault_name: String,
    pub items: Vec<(ItemKey, String)>,
}

/// One row of the combined list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedEntry {
    pub key: CredentialKey,
    pub item_title: String,
    pub credential_title: String,
}

fn vault_name(store: &VaultStore, vault_key: &str) -> String {
    store
        .vault_keys()
        .into_iter()
        .find(|info| info.key == vault_key)
        .map(|info| info.display_name().to_string())
        .unwrap_or_else(|| vault_key.to_string())
}

pub fn grouped<S: AsRef<str>>(store: &VaultStore, selected: &[S]) -> Vec<SecretGroup> {
    let mut groups: Vec<SecretGroup> = Vec::new();

    for key in store.list_secrets_for_selected_vaults(selected) {
        // An item can disappear between listing and lookup if a reload lands.
        let Some(item) = store.get_item(&key) else {
            continue;
        };
        match groups.last_mut() {
            Some(group) if group.vault_key == key.vault_key => group.items.push((key, item.title)),
            _ => groups.push(SecretGroup {
                vault_name: vault_name(store, &key.vault_key),
                vault_key: key.vault_key.clone(),
                items: vec![(key, item.title)],
            }),
        }
    }

    groups
}

pub fn combined<S: AsRef<str>>(store: &VaultStore, selected: &[S]) -> Vec<CombinedEntry> {
    store
        .list_secrets_for_selected_vaults(selected)
        .into_iter()
        .filter_map(|key| store.get_item(&key).map(|item| (key, item)))
        .flat_map(|(key, item)| {
            item.credentials
                .into_iter()
                .map(move |(cred_key, cred)| CombinedEntry {
                    credential_title: cred.title.unwrap_or_else(|| cred_key.clone()),
                    key: key.credential(cred_key),
                    item_title: item.title.clone(),
                })
        })
        .collect()
}

pub fn render_grouped(groups: &[SecretGroup], out: &mut impl Write) -> io::Result<()> {
    if groups.is_empty() {
        return writeln!(out, "No secrets found.");
    }
    for group in groups {
        writeln!(out, "{} ({})", group.vault_name, group.vault_key)?;
        for (key, title) in &group.items {
            writeln!(out, "  {:<24} {}", key.item_key, title)?;
        }
    }
    Ok(())
}

pub fn render_combined(
    entries: &[CombinedEntry],
    out: &mut impl Write,
    show_refs: bool,
) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No secrets found.");
    }
    for entry in entries {
        if show_refs {
            writeln!(
                out,
                "{} / {:<20} {}",
                entry.item_title, entry.credential_title, entry.key
            )?;
        } else {
            writeln!(out, "{} / {}", entry.item_title, entry.credential_title)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{Client, MemoryTransport};
    use serde_json::json;
    use std::sync::Arc;

    async fn loaded_store() -> VaultStore {
        let transport = Arc::new(MemoryTransport::new(|command, args| match command {
            "list_vaults" => Ok(json!({"vaults": [{"key": "work", "name": "Work"}, {"key": "home"}]})),
            _ => match args["vault_key"].as_str() {
                Some("work") => Ok(json!({"vault": {"key": "work", "path": "", "data": {
                    "github": {"title": "GitHub", "credentials": {
                        "token": {"title": "API token"}, "password": {"title": null}
                    }}
                }}})),
                _ => Ok(json!({"vault": {"key": "home", "path": "", "data": {
                    "wifi": {"title": "Wi-Fi", "credentials": {"psk": {"title": "Key"}}}
                }}})),
            },
        }));
        let store = VaultStore::new(Client::new(transport));
        store.reload_all().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_grouped_by_vault() {
        let store = loaded_store().await;
        let groups = grouped(&store, &["work", "home"]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].vault_key, "home");
        assert_eq!(groups[1].vault_name, "Work");
        assert_eq!(groups[1].items, vec![(ItemKey::new("work", "github"), "GitHub".to_string())]);
    }

    #[tokio::test]
    async fn test_combined_flattens_credentials() {
        let store = loaded_store().await;
        let entries = combined(&store, &["work"]);

        let refs: Vec<_> = entries.iter().map(|e| e.key.to_string()).collect();
        assert_eq!(
            refs,
            vec!["vault://work/github/password", "vault://work/github/token"]
        );
        assert_eq!(entries[0].credential_title, "password");
        assert_eq!(entries[1].credential_title, "API token");

        let mut out = Vec::new();
        render_combined(&entries, &mut out, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "GitHub / password\nGitHub / API token\n"
        );
    }

    #[tokio::test]
    async fn test_empty_selection_renders_placeholder() {
        let store = loaded_store().await;
        let mut out = Vec::new();
        render_grouped(&grouped::<&str>(&store, &[]), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No secrets found.\n");
    }
}
