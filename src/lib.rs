//! vaultdesk - a terminal front-end for a secret vault backend.
//!
//! This crate provides:
//! - An RPC client for the backend's newline-delimited JSON socket protocol
//! - A cache of vault contents that is reloaded after every mutation
//! - Startup mode dispatch between the vault manager and the GPG pinentry /
//!   SSH askpass password screens
//! - The password request flow that answers those screens
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vaultdesk::{Client, Config, SocketTransport, VaultStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let transport = SocketTransport::connect(&config.socket_path(), Duration::from_secs(30)).await?;
//!     let store = VaultStore::new(Client::new(Arc::new(transport)));
//!
//!     for vault in store.load_vault_keys().await? {
//!         println!("{} ({})", vault.display_name(), vault.key);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod keys;
pub mod mode;
pub mod request;
pub mod rpc;
pub mod store;
pub mod ui;
pub mod utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{DeskError, Result};
pub use keys::{CredentialKey, ItemKey};
pub use mode::{ModeDispatcher, Screen};
pub use rpc::{Client, MemoryTransport, SocketTransport, Transport};
pub use store::{StoreEvent, VaultHandle, VaultStore};
