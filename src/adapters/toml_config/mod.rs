// TOML config adapter - Configuration loading from TOML files

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::app::config::AppConfig;
use crate::domain::errors::*;

/// Table holding this tool's keys
const SECTION: &str = "splitmerge";

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    search_paths: Vec<PathBuf>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter with the default search paths
    pub fn new() -> Self {
        Self {
            search_paths: Self::default_search_paths(),
        }
    }

    /// Create adapter searching only the given paths, in order
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("splitmerge.toml"),
            PathBuf::from("config").join("splitmerge.toml"),
        ];
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(config_home).join("splitmerge").join("config.toml"));
        }
        paths
    }

    /// First existing file among the search paths
    pub fn discover(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.is_file()).cloned()
    }

    /// Load configuration from file; missing keys keep their defaults
    pub fn load(&self, file_path: &Path) -> Result<AppConfig, DomainError> {
        if !file_path.exists() {
            return Err(DomainError::NotFound(file_path.to_path_buf()));
        }

        let content = std::fs::read_to_string(file_path).map_err(|e| {
            DomainError::Fs(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        debug!("Parsing configuration from {}", file_path.display());
        Self::parse(&content)
    }

    /// Parse a TOML document into configuration
    pub fn parse(toml_content: &str) -> Result<AppConfig, DomainError> {
        let parsed: toml::Table = toml::from_str(toml_content)
            .map_err(|e| DomainError::Input(format!("Failed to parse TOML config: {}", e)))?;

        match parsed.get(SECTION) {
            Some(section) => section
                .clone()
                .try_into()
                .map_err(|e| DomainError::Input(format!("Invalid [{}] section: {}", SECTION, e))),
            None => Ok(AppConfig::default()),
        }
    }

    /// Serialize config to a TOML document
    pub fn serialize(config: &AppConfig) -> Result<String, DomainError> {
        let mut root = toml::Table::new();
        let section = toml::Value::try_from(config)
            .map_err(|e| DomainError::Input(format!("Failed to serialize config: {}", e)))?;
        root.insert(SECTION.to_string(), section);
        toml::to_string_pretty(&root)
            .map_err(|e| DomainError::Input(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}
