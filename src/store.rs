//! Client-side cache of vault metadata and contents.
//!
//! The store owns the sorted vault key list and one shared handle per loaded
//! vault. A reload replaces the contents behind the existing handle, so a
//! view holding a [`VaultHandle`] sees fresh data without re-resolving it.
//! Every change is announced on a broadcast channel ([`VaultStore::subscribe`]).
//!
//! Backend failures propagate to the caller untouched. The store keeps no
//! error state and a failed reload leaves the previous contents in place.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;

use crate::error::Result;
use crate::keys::{CredentialKey, ItemKey};
use crate::rpc::{AddVaultRequest, Client, VaultInfo, VaultItemCredentialSchema, VaultItemSchema, VaultSchema};
use crate::utils::collate;

/// Shared, reload-stable view of one vault's contents.
pub type VaultHandle = Arc<RwLock<VaultSchema>>;

/// What changed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The vault key list was replaced.
    VaultKeysChanged,
    /// The contents of this vault were (re)loaded.
    VaultReloaded(String),
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct VaultStore {
    client: Client,
    vault_keys: RwLock<Vec<VaultInfo>>,
    vaults: RwLock<HashMap<String, VaultHandle>>,
    changes: broadcast::Sender<StoreEvent>,
}

impl VaultStore {
    pub fn new(client: Client) -> Self {
        let (changes, _) = broadcast::channel(32);
        Self {
            client,
            vault_keys: RwLock::new(Vec::new()),
            vaults: RwLock::new(HashMap::new()),
            changes,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Receive a [`StoreEvent`] for every subsequent change.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.changes.subscribe()
    }

    fn notify(&self, event: StoreEvent) {
        // Nobody listening is not an error.
        let _ = self.changes.send(event);
    }

    /// Fetch the vault list, sort it by display name and replace the cached list.
    pub async fn load_vault_keys(&self) -> Result<Vec<VaultInfo>> {
        let mut vaults = self.client.list_vaults().await?;
        vaults.sort_by(|a, b| collate(a.display_name(), b.display_name()));

        tracing::debug!(count = vaults.len(), "loaded vault keys");
        *write(&self.vault_keys) = vaults.clone();
        self.notify(StoreEvent::VaultKeysChanged);
        Ok(vaults)
    }

    /// Fetch one vault's contents into the cache.
    ///
    /// An existing entry keeps its handle and has its contents replaced;
    /// otherwise a new entry is inserted. Concurrent reloads of the same key
    /// are not coalesced: whichever completes last is what stays cached.
    pub async fn reload(&self, vault_key: &str) -> Result<VaultHandle> {
        let response = self.client.get_vault(Some(vault_key)).await?;

        let handle = {
            let mut vaults = write(&self.vaults);
            match vaults.get(vault_key) {
                Some(existing) => {
                    *write(existing) = response.vault;
                    Arc::clone(existing)
                }
                None => {
                    let handle = Arc::new(RwLock::new(response.vault));
                    vaults.insert(vault_key.to_string(), Arc::clone(&handle));
                    handle
                }
            }
        };

        tracing::debug!(vault = vault_key, "reloaded vault");
        self.notify(StoreEvent::VaultReloaded(vault_key.to_string()));
        Ok(handle)
    }

    /// Reload the key list, then every listed vault one after another.
    pub async fn reload_all(&self) -> Result<()> {
        let vaults = self.load_vault_keys().await?;
        for info in &vaults {
            self.reload(&info.key).await?;
        }
        Ok(())
    }

    /// Create a vault on the backend and refresh the key list.
    ///
    /// The new vault's contents are not loaded; call [`reload`](Self::reload).
    pub async fn add_vault(&self, name: Option<&str>, vault_key: &str) -> Result<()> {
        let request = AddVaultRequest {
            vault_name: name.map(str::to_string),
            vault_key: vault_key.to_string(),
        };
        self.client.add_vault(&request).await?;
        self.load_vault_keys().await?;
        Ok(())
    }

    /// The cached vault list, in display order.
    pub fn vault_keys(&self) -> Vec<VaultInfo> {
        read(&self.vault_keys).clone()
    }

    /// The shared handle for a loaded vault.
    pub fn vault(&self, vault_key: &str) -> Option<VaultHandle> {
        read(&self.vaults).get(vault_key).cloned()
    }

    /// A copy of a loaded vault's current contents.
    pub fn vault_snapshot(&self, vault_key: &str) -> Option<VaultSchema> {
        self.vault(vault_key).map(|handle| read(&handle).clone())
    }

    pub fn get_item(&self, key: &ItemKey) -> Option<VaultItemSchema> {
        let handle = self.vault(&key.vault_key)?;
        let vault = read(&handle);
        vault.data.get(&key.item_key).cloned()
    }

    pub fn get_credential(&self, key: &CredentialKey) -> Option<VaultItemCredentialSchema> {
        let handle = self.vault(&key.vault_key)?;
        let vault = read(&handle);
        vault
            .data
            .get(&key.item_key)?
            .credentials
            .get(&key.cred_key)
            .cloned()
    }

    /// Every item of the selected vaults, ordered by vault key then item key.
    ///
    /// Vaults that are not loaded contribute nothing.
    pub fn list_secrets_for_selected_vaults<S: AsRef<str>>(&self, selected: &[S]) -> Vec<ItemKey> {
        let vaults = read(&self.vaults);
        let mut keys = BTreeSet::new();

        for vault_key in selected {
            let Some(handle) = vaults.get(vault_key.as_ref()) else {
                continue;
            };
            let vault = read(handle);
            for item_key in vault.data.keys() {
                keys.insert(ItemKey::new(vault_key.as_ref(), item_key.clone()));
            }
        }

        keys.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::MemoryTransport;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store_with<F>(handler: F) -> (VaultStore, Arc<MemoryTransport>)
    where
        F: Fn(&str, &Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        let transport = Arc::new(MemoryTransport::new(handler));
        (VaultStore::new(Client::new(transport.clone())), transport)
    }

    fn vault_json(key: &str, items: &[&str]) -> Value {
        let data: serde_json::Map<String, Value> = items
            .iter()
            .map(|item| {
                (
                    item.to_string(),
                    json!({"title": item.to_uppercase(), "credentials": {"password": {"title": "Password"}}}),
                )
            })
            .collect();
        json!({"vault": {"key": key, "name": null, "path": format!("/vaults/{}", key), "data": data}})
    }

    #[tokio::test]
    async fn test_load_vault_keys_sorts_by_display_name() {
        let (store, _) = store_with(|_, _| {
            Ok(json!({"vaults": [{"key": "alpha", "name": null}, {"key": "beta", "name": "Aaa"}]}))
        });

        let keys = store.load_vault_keys().await.unwrap();
        let order: Vec<_> = keys.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(order, vec!["beta", "alpha"]);
        assert_eq!(store.vault_keys(), keys);
    }

    #[tokio::test]
    async fn test_load_vault_keys_sorts_accented_names_with_base_letter() {
        let (store, _) = store_with(|_, _| {
            Ok(json!({"vaults": [
                {"key": "z", "name": "Zeta"},
                {"key": "e", "name": "Éclair"},
                {"key": "apple"}
            ]}))
        });

        let keys = store.load_vault_keys().await.unwrap();
        let order: Vec<_> = keys.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(order, vec!["apple", "e", "z"]);
    }

    #[tokio::test]
    async fn test_reload_keeps_handle_and_takes_latest_contents() {
        let round = Arc::new(AtomicUsize::new(0));
        let r = round.clone();
        let (store, _) = store_with(move |_, _| {
            if r.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vault_json("work", &["github", "gitlab"]))
            } else {
                Ok(vault_json("work", &["aws"]))
            }
        });

        let first = store.reload("work").await.unwrap();
        let second = store.reload("work").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let keys: Vec<_> = first.read().unwrap().data.keys().cloned().collect();
        assert_eq!(keys, vec!["aws".to_string()]);
        assert_eq!(round.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_reload_propagates_and_keeps_previous() {
        let fail = Arc::new(Mutex::new(false));
        let f = fail.clone();
        let (store, _) = store_with(move |_, _| {
            if *f.lock().unwrap() {
                Err("Failed to unlock vault.".to_string())
            } else {
                Ok(vault_json("work", &["github"]))
            }
        });

        store.reload("work").await.unwrap();
        *fail.lock().unwrap() = true;

        let err = store.reload("work").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to unlock vault.");
        assert!(store.get_item(&ItemKey::new("work", "github")).is_some());
    }

    #[tokio::test]
    async fn test_lookups_on_missing_keys_return_none() {
        let (store, _) = store_with(|_, _| Ok(vault_json("work", &["github"])));
        store.reload("work").await.unwrap();

        assert!(store.get_item(&ItemKey::new("home", "github")).is_none());
        assert!(store.get_item(&ItemKey::new("work", "nope")).is_none());
        assert!(
            store
                .get_credential(&CredentialKey::new("work", "github", "nope"))
                .is_none()
        );
        assert_eq!(
            store
                .get_credential(&CredentialKey::new("work", "github", "password"))
                .and_then(|c| c.title),
            Some("Password".to_string())
        );
    }

    #[tokio::test]
    async fn test_list_secrets_for_selected_vaults() {
        let (store, _) = store_with(|_, args| {
            match args["vault_key"].as_str() {
                Some("v2") => Ok(vault_json("v2", &["b", "a"])),
                Some("v1") => Ok(vault_json("v1", &["z", "m"])),
                _ => Ok(vault_json("v3", &["x"])),
            }
        });
        for key in ["v2", "v1", "v3"] {
            store.reload(key).await.unwrap();
        }

        let listed = store.list_secrets_for_selected_vaults(&["v2", "v1", "not-loaded"]);
        assert_eq!(
            listed,
            vec![
                ItemKey::new("v1", "m"),
                ItemKey::new("v1", "z"),
                ItemKey::new("v2", "a"),
                ItemKey::new("v2", "b"),
            ]
        );
        assert!(store.list_secrets_for_selected_vaults::<&str>(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_reload_all_is_sequential() {
        let (store, transport) = store_with(|command, args| match command {
            "list_vaults" => Ok(json!({"vaults": [{"key": "b"}, {"key": "a"}]})),
            _ => Ok(vault_json(args["vault_key"].as_str().unwrap_or(""), &["item"])),
        });

        store.reload_all().await.unwrap();

        let calls: Vec<_> = transport
            .calls()
            .into_iter()
            .map(|c| format!("{} {}", c.command, c.args["vault_key"].as_str().unwrap_or("")))
            .collect();
        assert_eq!(calls, vec!["list_vaults ", "get_vault a", "get_vault b"]);
    }

    #[tokio::test]
    async fn test_add_vault_reloads_keys_only() {
        let (store, transport) = store_with(|command, _| match command {
            "list_vaults" => Ok(json!({"vaults": [{"key": "new", "name": "New"}]})),
            _ => Ok(Value::Null),
        });

        store.add_vault(Some("New"), "new").await.unwrap();

        assert_eq!(transport.call_count("add_vault"), 1);
        assert_eq!(transport.call_count("list_vaults"), 1);
        assert_eq!(transport.call_count("get_vault"), 0);
        assert!(store.vault("new").is_none());
        assert_eq!(
            transport.calls()[0].args,
            json!({"vault_name": "New", "vault_key": "new"})
        );
    }

    #[tokio::test]
    async fn test_changes_are_broadcast() {
        let (store, _) = store_with(|command, _| match command {
            "list_vaults" => Ok(json!({"vaults": []})),
            _ => Ok(vault_json("work", &[])),
        });
        let mut changes = store.subscribe();

        store.load_vault_keys().await.unwrap();
        store.reload("work").await.unwrap();

        assert_eq!(changes.recv().await.unwrap(), StoreEvent::VaultKeysChanged);
        assert_eq!(
            changes.recv().await.unwrap(),
            StoreEvent::VaultReloaded("work".to_string())
        );
    }
}
