//! Composite identifiers for items and credentials.
//!
//! Equality is structural: two keys are equal when their strings are.

use std::fmt;
use std::str::FromStr;

use crate::error::DeskError;
use crate::rpc::{DecryptedCredentialRequest, DeleteCredentialRequest, DeleteItemRequest};
use crate::utils::{REF_SCHEME, parse_credential_ref, parse_item_ref};

/// An item within a vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub vault_key: String,
    pub item_key: String,
}

/// A credential within an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CredentialKey {
    pub vault_key: String,
    pub item_key: String,
    pub cred_key: String,
}

impl ItemKey {
    pub fn new(vault_key: impl Into<String>, item_key: impl Into<String>) -> Self {
        Self {
            vault_key: vault_key.into(),
            item_key: item_key.into(),
        }
    }

    /// Parse "vault://VAULT/ITEM", or a bare item key with a default vault.
    pub fn parse(input: &str, default_vault: Option<&str>) -> Result<Self, DeskError> {
        let (vault_key, item_key) = parse_item_ref(input, default_vault)?;
        Ok(Self {
            vault_key,
            item_key,
        })
    }

    pub fn credential(&self, cred_key: impl Into<String>) -> CredentialKey {
        CredentialKey {
            vault_key: self.vault_key.clone(),
            item_key: self.item_key.clone(),
            cred_key: cred_key.into(),
        }
    }

    pub fn delete_request(&self) -> DeleteItemRequest {
        DeleteItemRequest {
            vault_key: self.vault_key.clone(),
            item_key: self.item_key.clone(),
        }
    }
}

impl CredentialKey {
    pub fn new(
        vault_key: impl Into<String>,
        item_key: impl Into<String>,
        cred_key: impl Into<String>,
    ) -> Self {
        Self {
            vault_key: vault_key.into(),
            item_key: item_key.into(),
            cred_key: cred_key.into(),
        }
    }

    /// Parse "vault://VAULT/ITEM/CRED", or "ITEM/CRED" with a default vault.
    pub fn parse(input: &str, default_vault: Option<&str>) -> Result<Self, DeskError> {
        let (vault_key, item_key, cred_key) = parse_credential_ref(input, default_vault)?;
        Ok(Self {
            vault_key,
            item_key,
            cred_key,
        })
    }

    pub fn item(&self) -> ItemKey {
        ItemKey::new(self.vault_key.clone(), self.item_key.clone())
    }

    pub fn decrypt_request(&self) -> DecryptedCredentialRequest {
        DecryptedCredentialRequest {
            vault_key: self.vault_key.clone(),
            item_key: self.item_key.clone(),
            credential_key: self.cred_key.clone(),
        }
    }

    pub fn delete_request(&self) -> DeleteCredentialRequest {
        DeleteCredentialRequest {
            vault_key: self.vault_key.clone(),
            item_key: self.item_key.clone(),
            credential_key: self.cred_key.clone(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", REF_SCHEME, self.vault_key, self.item_key)
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}/{}/{}",
            REF_SCHEME, self.vault_key, self.item_key, self.cred_key
        )
    }
}

impl FromStr for ItemKey {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

impl FromStr for CredentialKey {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}
