//! Configuration type definitions.

use knuffel::Decode;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::DeskError;

/// Per-call backend timeout used when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SOCKET_NAME: &str = "vaultdesk/backend.sock";

const VALID_KEYS: &str = "socket, timeout_secs, vault, log_level, show_refs";

/// Expand tilde (~) prefix to the user's home directory.
/// Handles both "~" alone and "~/path/to/something" patterns.
pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Main configuration structure parsed from vaultdesk.kdl.
#[derive(Debug, Decode, Clone, Default)]
pub struct Config {
    #[knuffel(child)]
    pub backend: Option<BackendConfig>,

    #[knuffel(child)]
    pub defaults: Option<Defaults>,
}

/// How to reach the backend process.
#[derive(Debug, Decode, Clone, Default)]
pub struct BackendConfig {
    #[knuffel(property)]
    pub socket: Option<String>,

    #[knuffel(property(name = "timeout_secs"))]
    pub timeout_secs: Option<u64>,
}

/// Front-end defaults.
#[derive(Debug, Decode, Clone, Default)]
pub struct Defaults {
    /// Vault used when a reference omits the vault:// prefix.
    #[knuffel(property)]
    pub vault: Option<String>,

    #[knuffel(property(name = "log_level"))]
    pub log_level: Option<String>,

    /// Print credential references (vault://...) in listings.
    #[knuffel(property(name = "show_refs"))]
    pub show_refs: Option<bool>,
}

impl Config {
    /// Backend socket path. Defaults to the runtime dir, then the data dir.
    pub fn socket_path(&self) -> PathBuf {
        self.backend
            .as_ref()
            .and_then(|b| b.socket.as_deref())
            .map(expand_tilde)
            .or_else(|| dirs::runtime_dir().map(|d| d.join(SOCKET_NAME)))
            .or_else(|| dirs::data_dir().map(|d| d.join(SOCKET_NAME)))
            .unwrap_or_else(|| PathBuf::from("backend.sock"))
    }

    pub fn timeout_secs(&self) -> u64 {
        self.backend
            .as_ref()
            .and_then(|b| b.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs())
    }

    /// Get the default vault (if set).
    pub fn default_vault(&self) -> Option<String> {
        self.defaults.as_ref().and_then(|d| d.vault.clone())
    }

    pub fn log_level(&self) -> Option<String> {
        self.defaults.as_ref().and_then(|d| d.log_level.clone())
    }

    pub fn show_refs(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.show_refs)
            .unwrap_or(false)
    }

    /// Update a setting
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), DeskError> {
        match key {
            "socket" => {
                self.backend.get_or_insert_with(Default::default).socket = Some(value.to_string())
            }
            "timeout_secs" => {
                let secs = value
                    .parse()
                    .map_err(|_| DeskError::validation("Invalid number for timeout_secs"))?;
                self.backend.get_or_insert_with(Default::default).timeout_secs = Some(secs)
            }
            "vault" => {
                self.defaults.get_or_insert_with(Default::default).vault = Some(value.to_string())
            }
            "log_level" => {
                self.defaults.get_or_insert_with(Default::default).log_level =
                    Some(value.to_string())
            }
            "show_refs" => {
                let show = value
                    .parse()
                    .map_err(|_| DeskError::validation("show_refs must be true or false"))?;
                self.defaults.get_or_insert_with(Default::default).show_refs = Some(show)
            }
            _ => {
                return Err(DeskError::validation(format!(
                    "Unknown setting: {}. Valid settings: {}",
                    key, VALID_KEYS
                )));
            }
        }
        Ok(())
    }

    /// Get a setting value as string
    pub fn get_value(&self, key: &str) -> Result<String, DeskError> {
        match key {
            "socket" => Ok(self.socket_path().to_string_lossy().to_string()),
            "timeout_secs" => Ok(self.timeout_secs().to_string()),
            "vault" => Ok(self.default_vault().unwrap_or_else(|| "(not set)".to_string())),
            "log_level" => Ok(self.log_level().unwrap_or_else(|| "(not set)".to_string())),
            "show_refs" => Ok(self.show_refs().to_string()),
            _ => Err(DeskError::validation(format!(
                "Unknown setting: {}. Valid settings: {}",
                key, VALID_KEYS
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::default();
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert!(config.default_vault().is_none());
        assert!(!config.show_refs());
        assert!(config.socket_path().to_string_lossy().ends_with("backend.sock"));
    }

    #[test]
    fn test_set_and_get_values() {
        let mut config = Config::default();
        config.set_value("vault", "work").unwrap();
        config.set_value("timeout_secs", "5").unwrap();
        config.set_value("show_refs", "true").unwrap();
        config.set_value("socket", "/tmp/b.sock").unwrap();

        assert_eq!(config.get_value("vault").unwrap(), "work");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.show_refs());
        assert_eq!(config.socket_path(), PathBuf::from("/tmp/b.sock"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        assert!(config.set_value("timeout_secs", "soon").is_err());
        assert!(config.set_value("show_refs", "maybe").is_err());
        assert!(config.set_value("editor", "vim").is_err());
        assert!(config.get_value("editor").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/x.sock"), home.join("x.sock"));
        }
        assert_eq!(expand_tilde("/abs"), PathBuf::from("/abs"));
    }
}
