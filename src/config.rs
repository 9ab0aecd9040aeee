//! Configuration for the fields toolchain
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (theme-fields.toml)
//! - Environment variables (THEME_FIELDS__*)
//!
//! ## Example config file (theme-fields.toml):
//! ```toml
//! [theme]
//! root = "./wp-content/themes/twentytwo"
//!
//! [[theme.registered_templates]]
//! file = "team.php"
//! name = "Team Page"
//!
//! [cache]
//! enabled = true
//! ttl_secs = 3600
//!
//! [store]
//! path = "./theme-fields-store.json"
//!
//! [export]
//! site_url = "https://example.test"
//! pretty = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::scanner::RegisteredTemplate;

/// Main configuration for the fields toolchain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldsConfig {
    /// Theme settings
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Scan cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Theme configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Path to the active theme root
    #[serde(default = "default_theme_root")]
    pub root: PathBuf,

    /// Custom page templates registered by the host platform
    #[serde(default)]
    pub registered_templates: Vec<RegisteredTemplate>,
}

/// Scan cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cache lifetime in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the store document
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Site URL stamped into envelopes
    #[serde(default)]
    pub site_url: String,

    /// Pretty-print envelope JSON
    #[serde(default = "default_true")]
    pub pretty: bool,
}

// Default value functions
fn default_theme_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_store_path() -> PathBuf {
    PathBuf::from("theme-fields-store.json")
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            root: default_theme_root(),
            registered_templates: Vec::new(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            pretty: true,
        }
    }
}

impl FieldsConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "theme-fields.toml",
            ".theme-fields.toml",
            "config/theme-fields.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "theme-fields")
        {
            let xdg_config = config_dir.config_dir().join("theme-fields.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (THEME_FIELDS_*)
        builder = builder.add_source(
            Environment::with_prefix("THEME_FIELDS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get the theme root (resolves relative paths)
    pub fn theme_root(&self) -> PathBuf {
        if self.theme.root.is_absolute() {
            self.theme.root.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.theme.root)
        }
    }

    /// Cache lifetime as a [`Duration`]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}
