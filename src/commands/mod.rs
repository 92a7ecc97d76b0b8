//! Command handlers for the vaultdesk CLI.
//!
//! One handler per subcommand. Handlers that change vault contents reload
//! the affected vault from the backend before printing anything.

mod config_cmd;
mod credential;
mod default;
mod item;
mod passwords;
mod secrets;
mod settings;
mod vault;
mod vaults;

pub use config_cmd::handle_config;
pub use credential::handle_credential;
pub use default::{handle_default_command, render_vault_list};
pub use item::handle_item;
pub use passwords::handle_passwords;
pub use secrets::{handle_reveal, handle_secrets};
pub use settings::{handle_settings, handle_updates};
pub use vault::handle_vault;
pub use vaults::{handle_show, handle_vaults};

use crate::error::{DeskError, Result};
use crate::utils::name_to_slug;

/// The explicit key if given, otherwise one derived from `name`.
fn key_or_slug(key: Option<String>, name: &str, what: &str) -> Result<String> {
    let key = key.unwrap_or_else(|| name_to_slug(name));
    if key.is_empty() || key.contains('/') {
        return Err(DeskError::validation(format!("Invalid {} key: '{}'", what, key)));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_defaults_to_slug() {
        assert_eq!(key_or_slug(None, "My Vault", "vault").unwrap(), "my-vault");
        assert_eq!(key_or_slug(Some("mv".into()), "My Vault", "vault").unwrap(), "mv");
    }

    #[test]
    fn test_key_rejects_empty_and_slash() {
        assert!(key_or_slug(None, "   ", "item").is_err());
        assert!(key_or_slug(Some("a/b".into()), "x", "item").is_err());
    }
}
