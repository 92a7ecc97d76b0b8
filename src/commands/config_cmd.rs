//! Config command handlers - managing configuration.

use std::io::{self, Write};

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::error::Result;

/// Handle config subcommands. Shows the current config when none is given.
///
/// These run before any backend connection is made.
pub fn handle_config(config: &mut Config, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None => {
            let mut out = io::stdout().lock();
            match Config::find_existing_config() {
                Some(path) => writeln!(out, "// {}", path.display())?,
                None => writeln!(out, "// no config file found, showing defaults")?,
            }
            write!(out, "{}", config.to_kdl())?;
            writeln!(out, "// effective socket: {}", config.socket_path().display())?;
        }
        Some(ConfigCommands::Generate { path, overwrite }) => {
            let path = Config::generate_config_file(path, overwrite)?;
            println!("Config file created at: {}", path.display());
        }
        Some(ConfigCommands::Get { key }) => {
            println!("{}", config.get_value(&key)?);
        }
        Some(ConfigCommands::Set { key, value }) => {
            config.set_value(&key, &value)?;
            let path = Config::find_existing_config().unwrap_or_else(Config::default_config_path);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            config.save(&path)?;
            println!("Set {} = {} in {}", key, value, path.display());
        }
    }
    Ok(())
}
