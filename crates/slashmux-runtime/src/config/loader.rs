//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. `slashmux.toml` (or `.yaml`/`.yml` with `yaml-config`), found in the
//!    current directory or the user config directory; or an explicit file
//! 3. `DISCORD_TOKEN` and `DISCORD_GUILD_ID`
//! 4. Environment variables (`SLASHMUX_*`)
//! 5. Programmatic overrides set key by key with [`ConfigLoader::set`]
//!
//! # Environment Variable Mapping
//!
//! `SLASHMUX_` prefixed variables use `__` as the nesting separator:
//!
//! - `SLASHMUX_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `SLASHMUX_BOT__GUILD_ID=1234` → `bot.guild_id = "1234"`
//!
//! # Example
//!
//! ```rust,ignore
//! use slashmux_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//! let config = ConfigLoader::new().file("./deploy/slashmux.toml").load()?;
//! let config = ConfigLoader::new().set("logging.level", "debug").load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use serde::Serialize;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::SlashmuxConfig;
use super::validation::validate_config;

/// File names searched for in each search path, in order.
const FILE_NAMES: &[&str] = &[
    #[cfg(feature = "toml-config")]
    "slashmux.toml",
    #[cfg(feature = "yaml-config")]
    "slashmux.yaml",
    #[cfg(feature = "yaml-config")]
    "slashmux.yml",
];

/// Layered configuration loader.
pub struct ConfigLoader {
    overrides: Figment,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Adds a search path for configuration files. When none are given, the
    /// current directory and `<user config dir>/slashmux` are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads exactly this file instead of searching.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Sets the value at a dotted `key` such as `"bot.guild_id"`, on top of
    /// every other source. Keys not set here keep their loaded values.
    pub fn set<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<SlashmuxConfig> {
        let config: SlashmuxConfig = self.figment()?.extract()?;
        validate_config(&config)?;

        debug!(
            logging_level = %config.logging.level,
            scope = %config.bot.scope(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Builds the figment with all sources, without extracting it.
    pub fn figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(SlashmuxConfig::default()));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = merge_file(figment, path)?;
        } else {
            figment = self.search(figment)?;
        }

        if self.load_env {
            trace!("Loading environment variables");
            figment = figment
                .merge(
                    Env::raw()
                        .only(&["DISCORD_TOKEN", "DISCORD_GUILD_ID"])
                        .map(|key| {
                            if key.as_str().eq_ignore_ascii_case("discord_token") {
                                "bot.token".into()
                            } else {
                                "bot.guild_id".into()
                            }
                        }),
                )
                .merge(Env::prefixed("SLASHMUX_").split("__"));
        }

        Ok(figment.merge(self.overrides))
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("slashmux"));
        }
        paths
    }

    /// Merges the first configuration file found.
    fn search(&self, figment: Figment) -> ConfigResult<Figment> {
        for dir in self.resolve_search_paths() {
            for name in FILE_NAMES {
                let path = dir.join(name);
                if path.exists() {
                    info!(path = %path.display(), "Loading configuration file");
                    return merge_file(figment, &path);
                }
            }
        }
        warn!("No configuration file found, using defaults");
        Ok(figment)
    }
}

/// Merges a single config file, dispatching on its extension.
fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<SlashmuxConfig> {
    ConfigLoader::new().load()
}

// =============================================================================
// Tests
// =============================================================================
