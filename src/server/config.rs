//! Configuration file parsing for the recipe server
//!
//! Supports TOML configuration files with two sections:
//! - [server] - Bind address, static front-end directory
//! - [storage] - Collection file and how it is read and written

use crate::server::ServerConfig;
use crate::store::{ReadFailurePolicy, StoreConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
pub struct ServiceConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerSection,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSection,
}

/// Server configuration section
#[derive(Debug, Deserialize)]
pub struct ServerSection {
    /// API bind address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory with the browser front-end (None = API only)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: None,
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_true() -> bool {
    true
}

/// Storage configuration section
#[derive(Debug, Deserialize)]
pub struct StorageSection {
    /// Collection file
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Create an empty collection when the file is missing
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// "propagate" or "empty"
    #[serde(default)]
    pub read_failure: ReadFailurePolicy,

    /// Pretty-print the collection file
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            create_if_missing: true,
            read_failure: ReadFailurePolicy::default(),
            pretty: true,
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("recipes.json")
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: ServiceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?;

        if self.storage.data_file.as_os_str().is_empty() {
            anyhow::bail!("storage.data_file must not be empty");
        }

        Ok(())
    }

    /// Convert to the runtime server configuration
    pub fn to_server_config(&self) -> Result<ServerConfig> {
        let bind_addr = self
            .server
            .bind
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?;

        Ok(ServerConfig {
            bind_addr,
            store: StoreConfig {
                path: self.storage.data_file.clone(),
                create_if_missing: self.storage.create_if_missing,
                read_failure: self.storage.read_failure,
                pretty: self.storage.pretty,
            },
            static_dir: self.server.static_dir.clone(),
        })
    }
}
