use std::io::{self, Write};

use crate::store::{VaultHandle, VaultStore};

/// Outcome of opening one vault.
pub enum VaultView {
    Loaded(VaultHandle),
    /// The backend reported the vault as missing; offer to create it.
    Missing { vault_key: String },
    /// Any other failure, shown as-is.
    Failed { vault_key: String, message: String },
}

impl VaultView {
    /// Reload the vault and classify the result.
    pub async fn load(store: &VaultStore, vault_key: &str) -> Self {
        match store.reload(vault_key).await {
            Ok(handle) => VaultView::Loaded(handle),
            Err(e) if e.is_vault_not_found() => {
                tracing::debug!(vault = vault_key, "vault not found");
                VaultView::Missing {
                    vault_key: vault_key.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(vault = vault_key, error = %e, "failed to load vault");
                VaultView::Failed {
                    vault_key: vault_key.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Print the vault with its items and credential titles.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        match self {
            VaultView::Loaded(handle) => {
                let vault = handle.read().unwrap_or_else(|p| p.into_inner());
                writeln!(out, "{} ({})", vault.display_name(), vault.key)?;
                if !vault.path.is_empty() {
                    writeln!(out, "  {}", vault.path)?;
                }
                if vault.data.is_empty() {
                    writeln!(out, "  No secrets yet.")?;
                    return Ok(());
                }
                for (item_key, item) in &vault.data {
                    writeln!(out, "  {:<24} {}", item_key, item.title)?;
                    for (cred_key, cred) in &item.credentials {
                        writeln!(
                            out,
                            "    {:<22} {}",
                            cred_key,
                            cred.title.as_deref().unwrap_or(cred_key)
                        )?;
                    }
                }
                Ok(())
            }
            VaultView::Missing { vault_key } => {
                writeln!(out, "Vault not found.")?;
                writeln!(out, "Create it with: vaultdesk vault add {}", vault_key)
            }
            VaultView::Failed { vault_key, message } => {
                writeln!(out, "Error loading vault '{}': {}", vault_key, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{Client, MemoryTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn store_with(reply: std::result::Result<serde_json::Value, String>) -> VaultStore {
        let transport = Arc::new(MemoryTransport::new(move |_, _| reply.clone()));
        VaultStore::new(Client::new(transport))
    }

    fn rendered(view: &VaultView) -> String {
        let mut out = Vec::new();
        view.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_offers_create() {
        let store = store_with(Err("Failed to get vault: Vault not found".into()));
        let view = VaultView::load(&store, "work").await;

        assert!(matches!(view, VaultView::Missing { .. }));
        let text = rendered(&view);
        assert!(text.contains("Create it with: vaultdesk vault add work"));
        assert!(!text.contains("Error loading vault"));
    }

    #[tokio::test]
    async fn test_other_errors_render_generic_path() {
        let store = store_with(Err("Failed to unlock vault.".into()));
        let view = VaultView::load(&store, "work").await;

        assert!(matches!(view, VaultView::Failed { .. }));
        assert_eq!(
            rendered(&view),
            "Error loading vault 'work': Failed to unlock vault.\n"
        );
    }

    #[tokio::test]
    async fn test_loaded_lists_items_and_credentials() {
        let store = store_with(Ok(json!({"vault": {
            "key": "work", "name": "Work", "path": "/vaults/work.json",
            "data": {"github": {"title": "GitHub", "credentials": {
                "password": {"title": "Password"}, "totp": {"title": null}
            }}}
        }})));
        let view = VaultView::load(&store, "work").await;

        let text = rendered(&view);
        assert!(text.starts_with("Work (work)\n  /vaults/work.json\n"));
        assert!(text.contains("github"));
        assert!(text.contains("Password"));
        assert!(text.contains(&format!("    {:<22} {}", "totp", "totp")));
    }
}
