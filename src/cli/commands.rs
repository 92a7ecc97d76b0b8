//! Command and subcommand definitions.

use clap::Subcommand;
use std::path::PathBuf;

/// Top-level commands available in vaultdesk.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List vaults, sorted by name
    Vaults,
    /// Show one vault with its secrets (offers to create it if missing)
    Show {
        /// Vault key (default: the configured default vault)
        vault: Option<String>,
    },
    /// List secrets across vaults
    Secrets {
        /// Only these vaults (repeatable; default: all vaults)
        #[arg(short, long = "vault", value_name = "VAULT")]
        vaults: Vec<String>,

        /// One line per credential instead of grouping items by vault
        #[arg(short, long)]
        combined: bool,
    },
    /// Decrypt and print one credential
    Reveal {
        /// Credential reference: vault://VAULT/ITEM/CREDENTIAL
        /// If a default vault is set in config, ITEM/CREDENTIAL is enough.
        reference: String,
    },
    /// Create, rename or delete vaults
    Vault {
        #[command(subcommand)]
        command: VaultCommands,
    },
    /// Add, edit or delete secrets
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Add or delete credentials of a secret
    Credential {
        #[command(subcommand)]
        command: CredentialCommands,
    },
    /// Passphrases saved in the OS keychain
    Passwords {
        #[command(subcommand)]
        command: Option<PasswordCommands>,
    },
    /// Show helper setup and the vaults directory
    Settings {
        /// Ask the backend to run a GPG integration test
        #[arg(long)]
        test_gpg: bool,
    },
    /// Show update status
    Updates {
        /// Check for updates now
        #[arg(long)]
        check: bool,

        /// Enable automatic update checks
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Disable automatic update checks
        #[arg(long)]
        disable: bool,
    },
    /// Manage configuration (shows current config if no subcommand provided)
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Print version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum VaultCommands {
    /// Create a vault
    Add {
        /// Display name
        name: String,

        /// Vault key (default: derived from the name)
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Rename a vault or change its key
    Rename {
        vault: String,

        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// New vault key
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Delete a vault and everything in it (asks to type the key)
    Delete { vault: String },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add a secret to a vault
    Add {
        vault: String,

        title: String,

        /// Item key (default: derived from the title)
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Change the title of a secret or of its credentials (values are kept)
    Edit {
        /// Item reference: vault://VAULT/ITEM
        reference: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// Rename a credential: KEY=TITLE (repeatable)
        #[arg(short, long = "credential", value_name = "KEY=TITLE")]
        credentials: Vec<String>,
    },
    /// Delete a secret
    Delete {
        /// Item reference: vault://VAULT/ITEM
        reference: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CredentialCommands {
    /// Add a credential to a secret (the value is prompted for)
    Add {
        /// Item reference: vault://VAULT/ITEM
        reference: String,

        title: String,

        /// Credential key (default: derived from the title)
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Delete a credential
    Delete {
        /// Credential reference: vault://VAULT/ITEM/CREDENTIAL
        reference: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PasswordCommands {
    /// List saved passphrases
    List,
    /// Remove a saved passphrase from the keychain
    Forget {
        /// Key id as shown by `passwords list`
        key_id: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with default values
    Generate {
        /// Path where to create the config file (default: ~/.config/vaultdesk/vaultdesk.kdl)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite existing config file if it exists
        #[arg(long)]
        overwrite: bool,
    },
    /// Get a specific configuration value
    Get {
        /// Setting key (e.g., "socket", "timeout_secs", "vault")
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
}
