use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vaultdesk::cli::{Cli, Commands, GlobalArgs};
use vaultdesk::commands;
use vaultdesk::config::Config;
use vaultdesk::error::{DeskError, Result};
use vaultdesk::rpc::{Client, SocketTransport};
use vaultdesk::store::VaultStore;
use vaultdesk::ui::ErrorDialog;

fn init_logging(args: &GlobalArgs, config: &Config) {
    let log_level = match args.verbose {
        0 => config.log_level().unwrap_or_else(|| "warn".to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vaultdesk={log_level},warn")));

    // Logs go to stderr; stdout carries rendered views.
    if args.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&cli.global, &config);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting vaultdesk");

    let errors = ErrorDialog::stderr();
    match run(cli, &mut config, &errors).await {
        Ok(()) if errors.is_open() => ExitCode::FAILURE,
        Ok(()) => ExitCode::SUCCESS,
        Err(DeskError::Cancelled) => {
            eprintln!("Cancelled.");
            ExitCode::FAILURE
        }
        Err(e) => {
            errors.show_error(None, e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &mut Config, errors: &ErrorDialog) -> Result<()> {
    // Commands that never talk to the backend.
    let command = match cli.command {
        Some(Commands::Config { command }) => return commands::handle_config(config, command),
        Some(Commands::Version) => {
            println!("vaultdesk {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        other => other,
    };

    let socket = cli.global.socket.unwrap_or_else(|| config.socket_path());
    let transport = SocketTransport::connect(&socket, config.timeout()).await?;
    let store = VaultStore::new(Client::new(Arc::new(transport)));

    match command {
        None => commands::handle_default_command(&store).await,
        Some(Commands::Config { .. }) | Some(Commands::Version) => Ok(()),
        Some(Commands::Vaults) => commands::handle_vaults(&store).await,
        Some(Commands::Show { vault }) => commands::handle_show(config, &store, errors, vault).await,
        Some(Commands::Secrets { vaults, combined }) => {
            commands::handle_secrets(config, &store, errors, vaults, combined).await
        }
        Some(Commands::Reveal { reference }) => {
            commands::handle_reveal(config, &store, errors, &reference).await
        }
        Some(Commands::Vault { command }) => commands::handle_vault(&store, command).await,
        Some(Commands::Item { command }) => commands::handle_item(config, &store, command).await,
        Some(Commands::Credential { command }) => {
            commands::handle_credential(config, &store, command).await
        }
        Some(Commands::Passwords { command }) => {
            commands::handle_passwords(store.client(), command).await
        }
        Some(Commands::Settings { test_gpg }) => {
            commands::handle_settings(store.client(), test_gpg).await
        }
        Some(Commands::Updates {
            check,
            enable,
            disable,
        }) => commands::handle_updates(store.client(), check, enable, disable).await,
    }
}
