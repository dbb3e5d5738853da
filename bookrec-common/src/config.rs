//! Bootstrap configuration loading
//!
//! Settings are resolved once at startup and cannot change while running.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments / environment variables (`ConfigOverrides`)
//! 2. TOML configuration file
//! 3. Built-in defaults (code constants)
//!
//! A missing TOML file is not fatal: defaults apply.
//! A TOML file that exists but fails to parse is a configuration error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Default directory holding the JSON artifacts, relative to the working directory
pub const DEFAULT_MODELS_DIR: &str = "models";

/// Default CORS origin (the bundled frontend dev server)
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration loaded from TOML file
///
/// Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Address to bind the HTTP listener to
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Directory containing popular.json, pt.json, books.json and similarity_scores.json
    #[serde(default)]
    pub models_dir: Option<PathBuf>,

    /// Single origin allowed by CORS
    #[serde(default)]
    pub allowed_origin: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Command-line / environment overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub models_dir: Option<PathBuf>,
    pub allowed_origin: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub models_dir: PathBuf,
    pub allowed_origin: String,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::resolve(None, ConfigOverrides::default())
    }
}

impl ServiceConfig {
    /// Merge overrides, TOML values and compiled defaults (in that priority)
    pub fn resolve(toml_config: Option<TomlConfig>, overrides: ConfigOverrides) -> Self {
        let toml_config = toml_config.unwrap_or_default();

        Self {
            host: overrides
                .host
                .or(toml_config.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(toml_config.port).unwrap_or(DEFAULT_PORT),
            models_dir: overrides
                .models_dir
                .or(toml_config.models_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_DIR)),
            allowed_origin: overrides
                .allowed_origin
                .or(toml_config.allowed_origin)
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
            log_level: toml_config.logging.level,
        }
    }

    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let toml_str = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&toml_str)
        .map_err(|e| Error::Config(format!("Failed to parse TOML {}: {}", path.display(), e)))
}

/// Find the configuration file to use, if any
///
/// An explicit path is used only if it exists. Otherwise the per-user
/// config directory is tried, then `/etc/bookrec/config.toml` on Linux.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    if let Some(user_config) = dirs::config_dir().map(|d| d.join("bookrec").join("config.toml")) {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/bookrec/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
