//! Application configuration for wikimill.
//!
//! User config lives at `~/.wikimill/wikimill.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WikimillError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "wikimill.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".wikimill";

// ---------------------------------------------------------------------------
// Config structs (matching wikimill.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Wiki checkout location (cloned on demand if absent).
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Root directory for all generated output.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Worker pool size for parallel conversion. `0` means "detect from
    /// available CPUs".
    #[serde(default)]
    pub jobs: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            output_dir: default_output_dir(),
            jobs: 0,
        }
    }
}

fn default_repo() -> String {
    "sdlwiki".into()
}
fn default_output_dir() -> String {
    "output".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.wikimill/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WikimillError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.wikimill/wikimill.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| WikimillError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| WikimillError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| WikimillError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| WikimillError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| WikimillError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("sdlwiki"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.repo, "sdlwiki");
        assert_eq!(parsed.defaults.jobs, 0);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
jobs = 8
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.jobs, 8);
        assert_eq!(config.defaults.output_dir, "output");
    }
}
