//! Settings, update status and saved-passphrase views.

use std::io::{self, Write};

use chrono::{DateTime, Local};
use chrono_humanize::HumanTime;

use crate::rpc::{AppSettingsResponse, PasswordEntry, UpdateStatusResponse};

const HELPER_PLACEHOLDER: &str = "<helper-path>";

pub fn render_settings(settings: &AppSettingsResponse, out: &mut impl Write) -> io::Result<()> {
    let helper = settings
        .helper_bin_path
        .as_deref()
        .unwrap_or(HELPER_PLACEHOLDER);
    let escaped = helper.replace(' ', "\\ ");

    writeln!(out, "GPG")?;
    writeln!(out, "  Add the following to ~/.gnupg/gpg-agent.conf:")?;
    writeln!(out)?;
    writeln!(out, "    pinentry-program {}/bin/vault-pinentry", helper)?;
    writeln!(out)?;
    writeln!(out, "  Run `gpgconf --reload gpg-agent` to apply the changes,")?;
    writeln!(out, "  then `vaultdesk settings --test-gpg` to check the integration.")?;
    writeln!(out)?;

    writeln!(out, "SSH")?;
    writeln!(out, "  Add the following to your shell configuration (e.g. .zshrc or .bashrc):")?;
    writeln!(out)?;
    writeln!(out, "    export SSH_ASKPASS=\"{}/bin/vault-askpass\"", helper)?;
    writeln!(out, "    export SSH_ASKPASS_REQUIRE=force")?;
    writeln!(out)?;

    writeln!(out, "CLI")?;
    writeln!(out, "  Symlink the helper CLI into your PATH, e.g.:")?;
    writeln!(out)?;
    writeln!(out, "    ln -s \"{}/bin/vault\" /usr/local/bin/vault", escaped)?;
    writeln!(out)?;

    writeln!(out, "Vaults")?;
    writeln!(
        out,
        "  Vaults are saved to the directory below. You can back up or sync this folder as needed."
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "    {}",
        settings.vaults_dir.as_deref().unwrap_or("(unknown)")
    )
}

/// "3 hours ago (2026-01-02 03:04)", or the raw value if it does not parse.
pub fn format_checked_at(rfc3339: &str) -> String {
    match DateTime::parse_from_rfc3339(rfc3339) {
        Ok(at) => {
            let local = at.with_timezone(&Local);
            format!("{} ({})", HumanTime::from(local), local.format("%Y-%m-%d %H:%M"))
        }
        Err(_) => rfc3339.to_string(),
    }
}

pub fn render_update_status(
    status: &UpdateStatusResponse,
    check_disabled: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    match status {
        UpdateStatusResponse::UpdateAvailable { version, .. } => {
            writeln!(out, "Update available: {}", version)?
        }
        UpdateStatusResponse::UpToDate { version, .. } => {
            writeln!(out, "You're up to date! {}", version)?
        }
        UpdateStatusResponse::Error { error, .. } => {
            writeln!(out, "Error checking for updates: {}", error)?
        }
        UpdateStatusResponse::NotChecked => writeln!(out, "Updates have not been checked yet.")?,
    }
    if let Some(at) = status.checked_at() {
        writeln!(out, "Last checked: {}", format_checked_at(at))?;
    }
    writeln!(
        out,
        "Automatic update checks: {}",
        if check_disabled { "disabled" } else { "enabled" }
    )
}

pub fn render_passwords(entries: &[PasswordEntry], out: &mut impl Write) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No saved passphrases.");
    }
    writeln!(out, "{:<6} KEY", "TYPE")?;
    for entry in entries {
        writeln!(out, "{:<6} {}", entry.password_type.label(), entry.key_id)?;
    }
    Ok(())
}
