//! Configuration loading and management.

mod loader;
mod types;

pub use types::{BackendConfig, Config, DEFAULT_TIMEOUT_SECS, Defaults};
