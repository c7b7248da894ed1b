//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the config command against the file at `config_path`.
///
/// `settings` are the effective settings, environment overrides included.
/// `init` writes file defaults only, so overrides never end up on disk.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Init => {
            if init_config(config_path)? {
                Output::success(&format!("Created config at {:?}", config_path));
            } else {
                Output::warning(&format!("Config already exists at {:?}", config_path));
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Write default settings to `path` unless a file is already there.
fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    Settings::default().save_to(&path.to_path_buf())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_defaults_to_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("postbot.toml");

        assert!(init_config(&path).unwrap());

        let written = Settings::read_file(&path).unwrap();
        assert_eq!(written.vertex.project_id, "");
        assert_eq!(written.vertex.location, Settings::default().vertex.location);
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        assert!(!init_config(&path).unwrap());
        assert_eq!(Settings::read_file(&path).unwrap().server.port, 9000);
    }
}
