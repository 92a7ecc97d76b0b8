//! Terminal views: prompts, the shared error dialog, vault and secret
//! listings, masked secret values, settings and update status.

mod error_dialog;
pub mod lists;
pub mod prompt;
mod secret_value;
pub mod settings;
mod vault_view;

pub use error_dialog::{ErrorDialog, ShownError};
pub use prompt::TerminalPrompter;
pub use secret_value::HiddenSecretValue;
pub use vault_view::VaultView;

#[cfg(test)]
pub(crate) use error_dialog::test_support;
