//! CLI argument parsing structures.

use clap::{Args, Parser};
use std::path::PathBuf;

use super::commands::Commands;

/// Main CLI structure for vaultdesk.
#[derive(Parser, Debug)]
#[command(name = "vaultdesk")]
#[command(about = "Terminal front-end for a secret vault backend", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Without a command, runs the screen the backend asks for:
    /// the vault list, or a pinentry / askpass prompt.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all commands.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Backend socket path (overrides the config file)
    #[arg(long, global = true, env = "VAULTDESK_SOCKET")]
    pub socket: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}
