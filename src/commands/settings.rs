//! Settings and update status handlers.

use std::io::{self, Write};

use crate::error::Result;
use crate::rpc::Client;
use crate::ui::settings;

/// Handle the settings command
pub async fn handle_settings(client: &Client, test_gpg: bool) -> Result<()> {
    if test_gpg {
        client.gpg_test_integration().await?;
        println!("GPG integration test started. Check for a passphrase prompt.");
        return Ok(());
    }

    let app_settings = client.get_app_settings().await?;
    let mut out = io::stdout().lock();
    settings::render_settings(&app_settings, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Handle the updates command.
///
/// `--enable`/`--disable` change the automatic check preference before
/// the status is printed.
pub async fn handle_updates(client: &Client, check: bool, enable: bool, disable: bool) -> Result<()> {
    let check_disabled = if enable || disable {
        client.set_update_check_disabled(disable).await?
    } else {
        client.get_update_check_disabled().await?
    };

    let status = if check {
        client.check_updates().await?
    } else {
        client.get_update_status().await?
    };

    let mut out = io::stdout().lock();
    settings::render_update_status(&status, check_disabled, &mut out)?;
    out.flush()?;
    Ok(())
}
