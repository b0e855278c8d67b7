// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

// Service Configuration
//
// Kubernetes-style manifest (apiVersion/kind/metadata/spec) describing how a
// Storehouse node listens, where it persists, and how it reports:
// - HTTP bind address
// - Storage backend (in-memory or PostgreSQL) and pool sizing
// - Log level and optional Prometheus listener
// - Church reporting metadata

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::repository::{PostgresConfig, StorageBackend};

pub const API_VERSION: &str = "storehouse/v1";
pub const KIND: &str = "StorehouseConfig";

const CONFIG_PATH_ENV: &str = "STOREHOUSE_CONFIG_PATH";

/// Top-level configuration manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorehouseConfig {
    /// API version (must be "storehouse/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "StorehouseConfig")
    pub kind: String,

    pub metadata: ConfigMetadata,

    #[serde(default)]
    pub spec: StorehouseSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorehouseSpec {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub church: ChurchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatabaseBackend {
    InMemory,
    Postgres,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_backend")]
    pub backend: DatabaseBackend,

    /// PostgreSQL connection string; required for the postgres backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Apply pending migrations when the server starts
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prometheus scrape listener; disabled when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurchConfig {
    #[serde(default = "default_church_name")]
    pub name: String,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_backend() -> DatabaseBackend {
    DatabaseBackend::InMemory
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_church_name() -> String {
    "Storehouse".to_string()
}

fn default_currency() -> String {
    "KES".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: None,
            max_connections: default_max_connections(),
            run_migrations: default_true(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_port: None,
        }
    }
}

impl Default for ChurchConfig {
    fn default() -> Self {
        Self {
            name: default_church_name(),
            currency: default_currency(),
            timezone: None,
        }
    }
}

impl Default for StorehouseConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ConfigMetadata {
                name: "storehouse".to_string(),
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: StorehouseSpec::default(),
        }
    }
}

impl StorehouseConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Candidate locations, highest precedence first:
    /// 1. STOREHOUSE_CONFIG_PATH environment variable
    /// 2. ./storehouse-config.yaml
    /// 3. ~/.storehouse/config.yaml
    /// 4. /etc/storehouse/config.yaml
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(path));
        }
        paths.push(PathBuf::from("./storehouse-config.yaml"));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".storehouse").join("config.yaml"));
        }
        paths.push(PathBuf::from("/etc/storehouse/config.yaml"));
        paths
    }

    /// First existing file among [`Self::search_paths`].
    pub fn discover_config() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, falling back to defaults.
    ///
    /// An explicit path must exist and parse; a discovered file is used when
    /// found. Environment overrides apply in every case.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut config = if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?
        } else if let Some(path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", path);
            Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `DATABASE_URL`, `STOREHOUSE_HOST`, `STOREHOUSE_PORT` and
    /// `STOREHOUSE_LOG_LEVEL` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            tracing::info!("Environment override: DATABASE_URL (postgres backend)");
            self.spec.database.backend = DatabaseBackend::Postgres;
            self.spec.database.url = Some(url);
        }

        if let Some(host) = lookup("STOREHOUSE_HOST").filter(|v| !v.is_empty()) {
            tracing::info!("Environment override: STOREHOUSE_HOST={}", host);
            self.spec.server.host = host;
        }

        if let Some(raw) = lookup("STOREHOUSE_PORT") {
            match raw.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: STOREHOUSE_PORT={}", port);
                    self.spec.server.port = port;
                }
                Err(_) => {
                    tracing::warn!("Invalid value for STOREHOUSE_PORT: '{}'. Ignoring.", raw);
                }
            }
        }

        if let Some(level) = lookup("STOREHOUSE_LOG_LEVEL").filter(|v| !v.is_empty()) {
            tracing::info!("Environment override: STOREHOUSE_LOG_LEVEL={}", level);
            self.spec.observability.log_level = level;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.server.port == 0 {
            anyhow::bail!("spec.server.port must be non-zero");
        }

        if self.spec.database.max_connections == 0 {
            anyhow::bail!("spec.database.max_connections must be at least 1");
        }

        if self.spec.database.backend == DatabaseBackend::Postgres
            && self.spec.database.url.as_deref().map_or(true, str::is_empty)
        {
            anyhow::bail!("spec.database.url is required for the postgres backend");
        }

        Ok(())
    }

    /// Resolve the repository backend this configuration selects.
    pub fn storage_backend(&self) -> StorageBackend {
        match (self.spec.database.backend, &self.spec.database.url) {
            (DatabaseBackend::Postgres, Some(url)) => StorageBackend::PostgreSQL(PostgresConfig {
                connection_string: url.clone(),
                max_connections: self.spec.database.max_connections,
            }),
            _ => StorageBackend::InMemory,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.spec.server.host, self.spec.server.port)
    }
}
