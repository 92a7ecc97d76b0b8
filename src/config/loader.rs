//! Configuration file loading and saving.

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::DeskError;

const CONFIG_FILE: &str = "vaultdesk.kdl";

/// Quote a value as a KDL string literal.
fn kdl_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl Config {
    /// Get the explicit ~/.config/vaultdesk/vaultdesk.kdl path (XDG-style, cross-platform)
    fn xdg_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config/vaultdesk").join(CONFIG_FILE))
    }

    /// Get the list of config file search paths in priority order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];

        if let Some(xdg_path) = Self::xdg_config_path() {
            paths.push(xdg_path);
        }

        // Skip the platform config dir where it is the XDG path (Linux).
        if let Some(config_dir) = dirs::config_dir() {
            let native_path = config_dir.join("vaultdesk").join(CONFIG_FILE);
            if Self::xdg_config_path().as_ref() != Some(&native_path) {
                paths.push(native_path);
            }
        }

        if let Some(data_dir) = dirs::data_dir() {
            paths.push(data_dir.join("vaultdesk").join(CONFIG_FILE));
        }

        paths
    }

    /// Find existing config file by searching all standard locations
    pub fn find_existing_config() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|path| path.exists())
    }

    /// Get the default config path (~/.config/vaultdesk/vaultdesk.kdl)
    pub fn default_config_path() -> PathBuf {
        Self::xdg_config_path().unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Parse KDL text. `name` is only used in error messages.
    pub fn parse(name: &str, content: &str) -> Result<Self, DeskError> {
        knuffel::parse::<Config>(name, content)
            .map_err(|e| DeskError::config(format!("{}: {}", name, e)))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, DeskError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&path.to_string_lossy(), &content)
    }

    /// Load configuration, searching the standard locations.
    /// Returns the defaults if no file exists.
    pub fn load() -> Result<Self, DeskError> {
        match Self::find_existing_config() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load_from_path(&path)
            }
            None => Ok(Config::default()),
        }
    }

    /// Generate a config file with default values
    pub fn generate_config_file(path: Option<PathBuf>, overwrite: bool) -> Result<PathBuf, DeskError> {
        let config_path = path.unwrap_or_else(Self::default_config_path);

        if config_path.exists() && !overwrite {
            return Err(DeskError::validation(format!(
                "Config file already exists at: {}. Use --overwrite to replace it.",
                config_path.display()
            )));
        }

        if let Some(parent) = config_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let kdl_content = r#"// Backend connection
// socket defaults to $XDG_RUNTIME_DIR/vaultdesk/backend.sock
// timeout_secs bounds every backend call (default: 30)
backend timeout_secs=30
// backend socket="/run/user/1000/vaultdesk/backend.sock"

// Front-end defaults
// vault allows omitting the vault:// prefix (e.g., vaultdesk reveal github/token)
// show_refs prints vault:// references next to each credential
defaults log_level="info" show_refs=false
// defaults vault="personal"
"#;

        std::fs::write(&config_path, kdl_content)?;
        Ok(config_path)
    }

    /// Serialize config to KDL format
    pub fn to_kdl(&self) -> String {
        let mut output = String::from("// vaultdesk configuration file\n\n");

        output.push_str("backend");
        if let Some(b) = &self.backend {
            if let Some(socket) = &b.socket {
                output.push_str(&format!(" socket={}", kdl_string(socket)));
            }
            if let Some(timeout) = b.timeout_secs {
                output.push_str(&format!(" timeout_secs={}", timeout));
            }
        }
        output.push('\n');

        output.push_str("defaults");
        if let Some(d) = &self.defaults {
            if let Some(vault) = &d.vault {
                output.push_str(&format!(" vault={}", kdl_string(vault)));
            }
            if let Some(level) = &d.log_level {
                output.push_str(&format!(" log_level={}", kdl_string(level)));
            }
            if let Some(show) = d.show_refs {
                output.push_str(&format!(" show_refs={}", show));
            }
        }
        output.push('\n');

        output
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<(), DeskError> {
        std::fs::write(path, self.to_kdl())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kdl_string_escapes() {
        assert_eq!(kdl_string("plain"), r#""plain""#);
        assert_eq!(kdl_string(r#"a "b" \c"#), r#""a \"b\" \\c""#);
        assert_eq!(kdl_string("line\nbreak"), r#""line\nbreak""#);
    }

    #[test]
    fn test_to_kdl_round_trips_quotes_and_backslashes() {
        let mut config = Config::default();
        config.set_value("socket", r#"/tmp/my "odd" dir\backend.sock"#).unwrap();
        config.set_value("vault", r#"team\"ops""#).unwrap();

        let again = Config::parse("again.kdl", &config.to_kdl()).unwrap();
        assert_eq!(
            again.backend.unwrap().socket.as_deref(),
            Some(r#"/tmp/my "odd" dir\backend.sock"#)
        );
        assert_eq!(again.defaults.unwrap().vault.as_deref(), Some(r#"team\"ops""#));
    }
}
