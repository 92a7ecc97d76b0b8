//! Default command - runs whatever screen the backend asks for.

use std::io::{self, Write};
use std::sync::Arc;

use crate::error::Result;
use crate::mode::{ModeDispatcher, Screen};
use crate::request::{self, GpgPinentry, RequestFlow, SshAskpass};
use crate::rpc::VaultInfo;
use crate::store::VaultStore;
use crate::ui::TerminalPrompter;

/// Print the vault list as a two-column table.
pub fn render_vault_list(vaults: &[VaultInfo], out: &mut impl Write) -> io::Result<()> {
    if vaults.is_empty() {
        writeln!(out, "No vaults yet. Create one with: vaultdesk vault add <name>")?;
        return Ok(());
    }
    let width = vaults
        .iter()
        .map(|v| v.display_name().chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    writeln!(out, "{:<width$}  KEY", "NAME", width = width)?;
    for vault in vaults {
        writeln!(out, "{:<width$}  {}", vault.display_name(), vault.key, width = width)?;
    }
    Ok(())
}

/// Handle running without a subcommand.
///
/// In app mode this prints the vault list. In pinentry or askpass mode it
/// answers password requests on the terminal until the backend closes the
/// request channel.
pub async fn handle_default_command(store: &VaultStore) -> Result<()> {
    let client = store.client().clone();

    match ModeDispatcher::new(store).resolve().await? {
        Screen::Dashboard {
            helper_bin_path,
            vaults,
        } => {
            let mut out = io::stdout().lock();
            render_vault_list(&vaults, &mut out)?;
            if helper_bin_path.is_none() {
                writeln!(out)?;
                writeln!(out, "Helpers are not installed. See `vaultdesk settings`.")?;
            }
            Ok(())
        }
        Screen::GpgPinentry {
            initial,
            mut events,
        } => {
            let mut flow = RequestFlow::<GpgPinentry>::new(client, initial);
            request::run(&mut flow, &mut events, Arc::new(TerminalPrompter)).await
        }
        Screen::SshAskpass {
            initial,
            mut events,
        } => {
            let mut flow = RequestFlow::<SshAskpass>::new(client, initial);
            request::run(&mut flow, &mut events, Arc::new(TerminalPrompter)).await
        }
    }
}
