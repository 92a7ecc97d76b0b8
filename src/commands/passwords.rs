//! Saved passphrase handlers.

use std::io;

use crate::cli::PasswordCommands;
use crate::error::{DeskError, Result};
use crate::rpc::Client;
use crate::ui::{prompt, settings};

/// Handle the passwords command (lists when no subcommand is given)
pub async fn handle_passwords(client: &Client, command: Option<PasswordCommands>) -> Result<()> {
    match command.unwrap_or(PasswordCommands::List) {
        PasswordCommands::List => {
            let entries = client.list_passwords().await?;
            settings::render_passwords(&entries, &mut io::stdout().lock())?;
        }
        PasswordCommands::Forget { key_id, yes } => {
            let entry = client
                .list_passwords()
                .await?
                .into_iter()
                .find(|e| e.key_id == key_id)
                .ok_or_else(|| {
                    DeskError::not_found(format!("No saved passphrase for '{}'", key_id))
                })?;

            let question = format!(
                "Remove the saved {} passphrase for {} from the keychain?",
                entry.password_type.label(),
                entry.key_id
            );
            if !yes && !prompt::confirm(&question)? {
                println!("Cancelled.");
                return Ok(());
            }
            client.delete_password(&entry).await?;
            println!("Removed saved passphrase for {}", entry.key_id);
        }
    }
    Ok(())
}
