//! Configuration File Loading
//!
//! Looks for an optional configuration file in a fixed set of locations.
//! TOML is the default format; files ending in `.json` are read as JSON.

use super::{Config, RuntimeConfig};
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "SUBNET_CLIENT_CONFIG";

const APP_DIR: &str = "subnet-client";
const CONFIG_FILE: &str = "config.toml";
const LOCAL_CONFIG_FILE: &str = "subnet-client.toml";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension, TOML unless it says JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration file loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Candidate files, checked in order
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Loader over the standard locations
    pub fn new() -> Self {
        Self {
            search_paths: Self::default_search_paths(),
        }
    }

    /// Loader over an explicit list of candidate files
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// `$SUBNET_CLIENT_CONFIG`, then the user config dir, then the working dir
    pub fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                paths.push(PathBuf::from(path));
            }
        }
        if let Some(path) = Self::default_config_path() {
            paths.push(path);
        }
        paths.push(PathBuf::from(LOCAL_CONFIG_FILE));

        paths
    }

    /// `<config dir>/subnet-client/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the first existing candidate, or defaults when there is none
    ///
    /// An existing file that cannot be read, parsed or validated is an error;
    /// the caller decides whether to fall back.
    pub fn load(&self) -> Result<RuntimeConfig> {
        for path in &self.search_paths {
            if path.is_file() {
                debug!("Loading config from: {}", path.display());
                let config = Self::load_from_file(path)?;
                return Ok(RuntimeConfig::new(config, Some(path.clone())));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(RuntimeConfig::default())
    }

    /// Read, parse and validate one file
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let format = ConfigFormat::from_path(path);
        let config = Self::parse(&content, format)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text; missing keys take their defaults
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Config> {
        let parsed = match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|reason| Error::ConfigParseFailed {
            format: format.name().to_string(),
            reason,
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from the search paths, never failing
///
/// Problems are logged and the built-in defaults are used instead.
pub fn load_or_default() -> RuntimeConfig {
    match ConfigLoader::new().load() {
        Ok(runtime_config) => {
            match runtime_config.source() {
                Some(path) => info!("Configuration loaded from: {}", path.display()),
                None => info!("Using default configuration"),
            }
            runtime_config
        }
        Err(e) => {
            warn!("{}. Falling back to default configuration", e);
            RuntimeConfig::default()
        }
    }
}
