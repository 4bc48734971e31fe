// Configuration management
use crate::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Hosted backend connection
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Local JSON file of profile rows; used instead of the backend when set
    pub profiles_file: Option<PathBuf>,
    /// Local JSON file of listing rows; defaults to `listings.json` beside the profiles file
    pub listings_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// Print JSON instead of text by default
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Get the config directory path
    ///
    /// Priority:
    /// 1. XDG_CONFIG_HOME/agentdesk (if env var is set)
    /// 2. ~/.config/agentdesk (if ~/.config exists)
    /// 3. ~/.agentdesk (fallback on Unix)
    /// 4. Platform default on Windows
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config).join("agentdesk"));
        }

        #[cfg(unix)]
        {
            if let Some(home_dir) = dirs::home_dir() {
                let xdg_config = home_dir.join(".config");

                if xdg_config.exists() {
                    return Ok(xdg_config.join("agentdesk"));
                }

                return Ok(home_dir.join(".agentdesk"));
            }
        }

        #[cfg(not(unix))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                return Ok(config_dir.join("agentdesk"));
            }
        }

        Err(PortalError::ConfigError(
            "Could not determine config directory".to_string(),
        ))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, environment variables, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_file_path()?)?;
        config.apply_env();
        Ok(config)
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Config::default());
        }

        tracing::debug!("Loading config from: {}", config_path.display());
        let contents = fs::read_to_string(config_path)
            .map_err(|e| PortalError::ConfigError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| PortalError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("AGENTDESK_BACKEND_URL") {
            tracing::debug!("Using AGENTDESK_BACKEND_URL from environment: {}", url);
            self.backend.url = Some(url);
        }

        if let Some(key) = lookup("AGENTDESK_ANON_KEY") {
            tracing::debug!("Using AGENTDESK_ANON_KEY from environment");
            self.backend.anon_key = Some(key);
        }

        if let Some(token) = lookup("AGENTDESK_ACCESS_TOKEN") {
            tracing::debug!("Using AGENTDESK_ACCESS_TOKEN from environment");
            self.backend.access_token = Some(token);
        }

        if let Some(path) = lookup("AGENTDESK_PROFILES_FILE") {
            tracing::debug!("Using AGENTDESK_PROFILES_FILE from environment: {}", path);
            self.store.profiles_file = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("AGENTDESK_LISTINGS_FILE") {
            tracing::debug!("Using AGENTDESK_LISTINGS_FILE from environment: {}", path);
            self.store.listings_file = Some(PathBuf::from(path));
        }
    }

    /// Create a sample config file with comments
    pub fn create_sample() -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        Self::write_sample(&config_path)?;
        Ok(config_path)
    }

    fn write_sample(config_path: &Path) -> Result<()> {
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).map_err(|e| {
                    PortalError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
                tracing::info!("Created config directory: {}", config_dir.display());
            }
        }

        // Don't overwrite existing config
        if config_path.exists() {
            return Err(PortalError::ConfigError(format!(
                "Config file already exists at: {}",
                config_path.display()
            )));
        }

        let sample_config = r#"# agentdesk configuration
# Location priority:
#   1. $XDG_CONFIG_HOME/agentdesk/config.toml (if XDG_CONFIG_HOME is set)
#   2. ~/.config/agentdesk/config.toml (if ~/.config exists)
#   3. ~/.agentdesk/config.toml (fallback)
#
# Environment overrides:
#   AGENTDESK_BACKEND_URL, AGENTDESK_ANON_KEY, AGENTDESK_ACCESS_TOKEN,
#   AGENTDESK_PROFILES_FILE, AGENTDESK_LISTINGS_FILE

[backend]
# Project URL of the hosted backend
# Example: url = "https://abcdefgh.supabase.co"
url = ""

# Public anon key of the project
anon_key = ""

# Optional user access token; the anon key is sent when unset
# access_token = ""

[store]
# Read and write profiles from a local JSON file instead of the backend
# profiles_file = "/path/to/profiles.json"

# Listing rows for moderation; defaults to listings.json next to profiles_file
# listings_file = "/path/to/listings.json"

[display]
# Print JSON output by default
json = false
"#;

        fs::write(config_path, sample_config)
            .map_err(|e| PortalError::ConfigError(format!("Failed to write sample config: {}", e)))?;

        Ok(())
    }

    /// Backend URL and anon key, blank values count as missing
    pub fn backend_config(&self) -> Result<(&str, &str)> {
        let url = non_empty(&self.backend.url).ok_or_else(|| {
            PortalError::ConfigError(
                "Backend url not configured. Set it in config file or AGENTDESK_BACKEND_URL environment variable".to_string(),
            )
        })?;

        let anon_key = non_empty(&self.backend.anon_key).ok_or_else(|| {
            PortalError::ConfigError(
                "Backend anon_key not configured. Set it in config file or AGENTDESK_ANON_KEY environment variable".to_string(),
            )
        })?;

        Ok((url, anon_key))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.backend.url.is_none());
        assert!(config.store.profiles_file.is_none());
        assert!(!config.display.json);
    }

    #[test]
    fn test_sample_config_parses_and_is_incomplete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agentdesk").join("config.toml");

        Config::write_sample(&path).unwrap();
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.backend.url.as_deref(), Some(""));
        assert!(config.backend_config().is_err());
        assert!(Config::write_sample(&path).is_err());
    }

    #[test]
    fn test_load_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[backend]
url = "https://project.example.co"
anon_key = "anon"

[display]
json = true
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.backend_config().unwrap(),
            ("https://project.example.co", "anon")
        );
        assert!(config.display.json);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[backend\nurl = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(PortalError::ConfigError(_))
        ));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config::default();
        config.backend.url = Some("https://old.example.co".to_string());

        config.apply_overrides(|key| match key {
            "AGENTDESK_BACKEND_URL" => Some("https://new.example.co".to_string()),
            "AGENTDESK_PROFILES_FILE" => Some("/tmp/profiles.json".to_string()),
            "AGENTDESK_LISTINGS_FILE" => Some("/tmp/listings.json".to_string()),
            _ => None,
        });

        assert_eq!(config.backend.url.as_deref(), Some("https://new.example.co"));
        assert!(config.backend.anon_key.is_none());
        assert_eq!(
            config.store.profiles_file,
            Some(PathBuf::from("/tmp/profiles.json"))
        );
        assert_eq!(
            config.store.listings_file,
            Some(PathBuf::from("/tmp/listings.json"))
        );
    }

    #[test]
    fn test_load_listings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[store]
listings_file = "/srv/agentdesk/listings.json"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.store.profiles_file.is_none());
        assert_eq!(
            config.store.listings_file,
            Some(PathBuf::from("/srv/agentdesk/listings.json"))
        );
    }
}
