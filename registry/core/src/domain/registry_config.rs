// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Registry Configuration Types
//
// Defines the configuration schema for an agent registry node:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Storage backend selection (in-memory or PostgreSQL)
// - HTTP bind settings
// - Pagination bounds for agent listing
// - Logging and metrics settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::repository::{PostgresConfig, StorageBackend};

pub const API_VERSION: &str = "agent-registry/v1";
pub const KIND: &str = "RegistryConfig";

/// Largest page size a deployment may configure
pub const MAX_PAGE_SIZE: usize = 10_000;

/// Top-level Kubernetes-style registry configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfigManifest {
    /// API version (must be "agent-registry/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "RegistryConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: RegistryConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable deployment name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfigSpec {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "memory" or "postgres"
    #[serde(default = "default_storage_kind")]
    pub backend: StorageKind,

    /// PostgreSQL connection string (required for "postgres")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Apply bundled migrations on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the caller gives none
    #[serde(default = "default_page_size")]
    pub default_limit: usize,

    /// Upper bound on any requested page size
    #[serde(default = "default_max_page_size")]
    pub max_limit: usize,
}

impl PaginationConfig {
    /// Clamp a requested page size to `[1, max_limit]`
    pub fn clamp(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).clamp(1, self.max_limit.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Prometheus exporter port
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

fn default_true() -> bool {
    true
}

fn default_storage_kind() -> StorageKind {
    StorageKind::Memory
}

fn default_max_connections() -> u32 {
    5
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    8283
}

fn default_page_size() -> usize {
    50
}

fn default_max_page_size() -> usize {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_metrics_port() -> u16 {
    9091
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_kind(),
            database_url: None,
            max_connections: default_max_connections(),
            run_migrations: default_true(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_size(),
            max_limit: default_max_page_size(),
        }
    }
}

impl Default for RegistryConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "agent-registry".to_string(),
                version: None,
                labels: None,
            },
            spec: RegistryConfigSpec::default(),
        }
    }
}

impl RegistryConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. AGENT_REGISTRY_CONFIG_PATH environment variable
    /// 2. ./agent-registry.yaml (working directory)
    /// 3. ~/.agent-registry/config.yaml (user home)
    /// 4. /etc/agent-registry/config.yaml (system, Unix)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("AGENT_REGISTRY_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./agent-registry.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".agent-registry").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from("/etc/agent-registry/config.yaml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("AGENT_REGISTRY_DATABASE_URL") {
            tracing::info!("Environment override: AGENT_REGISTRY_DATABASE_URL (backend=postgres)");
            self.spec.storage.backend = StorageKind::Postgres;
            self.spec.storage.database_url = Some(url);
        }

        if let Ok(val) = std::env::var("AGENT_REGISTRY_RUN_MIGRATIONS") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => self.spec.storage.run_migrations = true,
                "false" | "0" | "no" | "off" => self.spec.storage.run_migrations = false,
                _ => {
                    tracing::warn!(
                        "Invalid value for AGENT_REGISTRY_RUN_MIGRATIONS: '{}'. Expected true/false. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!("Invalid apiVersion: '{}'. Must be '{}'", self.api_version, API_VERSION);
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let storage = &self.spec.storage;
        if storage.backend == StorageKind::Postgres {
            match storage.database_url.as_deref() {
                None | Some("") => anyhow::bail!("spec.storage.database_url is required for the postgres backend"),
                Some(_) => {}
            }
            if storage.max_connections == 0 {
                anyhow::bail!("spec.storage.max_connections must be at least 1");
            }
        }

        let pagination = &self.spec.pagination;
        if pagination.max_limit == 0 || pagination.max_limit > MAX_PAGE_SIZE {
            anyhow::bail!("spec.pagination.max_limit must be between 1 and {}", MAX_PAGE_SIZE);
        }
        if pagination.default_limit == 0 || pagination.default_limit > pagination.max_limit {
            anyhow::bail!(
                "spec.pagination.default_limit must be between 1 and max_limit ({})",
                pagination.max_limit
            );
        }

        Ok(())
    }

    /// Storage backend selected by this configuration
    pub fn storage_backend(&self) -> StorageBackend {
        match self.spec.storage.backend {
            StorageKind::Memory => StorageBackend::InMemory,
            StorageKind::Postgres => StorageBackend::PostgreSQL(PostgresConfig {
                connection_string: self.spec.storage.database_url.clone().unwrap_or_default(),
                max_connections: self.spec.storage.max_connections,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = RegistryConfigManifest::default();
        assert_eq!(manifest.api_version, API_VERSION);
        assert_eq!(manifest.kind, KIND);
        assert_eq!(manifest.spec.storage.backend, StorageKind::Memory);
        assert_eq!(manifest.spec.pagination.default_limit, 50);
        assert!(manifest.validate().is_ok());
        assert!(matches!(manifest.storage_backend(), StorageBackend::InMemory));
    }

    #[test]
    fn test_minimal_yaml_fills_defaults() {
        let yaml = r#"
apiVersion: agent-registry/v1
kind: RegistryConfig
metadata:
  name: staging
spec:
  storage:
    backend: postgres
    database_url: postgres://registry@localhost/registry
"#;
        let manifest = RegistryConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.metadata.name, "staging");
        assert_eq!(manifest.spec.http.port, 8283);
        assert_eq!(manifest.spec.storage.max_connections, 5);
        assert!(manifest.validate().is_ok());

        match manifest.storage_backend() {
            StorageBackend::PostgreSQL(pg) => {
                assert_eq!(pg.connection_string, "postgres://registry@localhost/registry");
            }
            other => panic!("unexpected backend: {:?}", other),
        }
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent-registry.yaml");

        let mut manifest = RegistryConfigManifest::default();
        manifest.spec.http.port = 9000;
        manifest.to_yaml_file(&path).unwrap();

        let loaded = RegistryConfigManifest::from_yaml_file(&path).unwrap();
        assert_eq!(loaded.spec.http.port, 9000);
        assert_eq!(loaded.kind, KIND);
    }

    #[test]
    fn test_validation() {
        let mut manifest = RegistryConfigManifest::default();

        manifest.api_version = "wrong/v1".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.kind = "NodeConfig".to_string();
        assert!(manifest.validate().is_err());
        manifest.kind = KIND.to_string();

        // Postgres without a URL
        manifest.spec.storage.backend = StorageKind::Postgres;
        assert!(manifest.validate().is_err());
        manifest.spec.storage.database_url = Some("postgres://localhost/registry".to_string());
        assert!(manifest.validate().is_ok());

        manifest.spec.pagination.default_limit = 1000;
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_max_limit_is_bounded() {
        let mut manifest = RegistryConfigManifest::default();
        manifest.spec.pagination.max_limit = usize::MAX;
        assert!(manifest.validate().is_err());

        manifest.spec.pagination.max_limit = MAX_PAGE_SIZE;
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_pagination_clamp() {
        let pagination = PaginationConfig { default_limit: 50, max_limit: 100 };
        assert_eq!(pagination.clamp(None), 50);
        assert_eq!(pagination.clamp(Some(0)), 1);
        assert_eq!(pagination.clamp(Some(10_000)), 100);
        assert_eq!(pagination.clamp(Some(7)), 7);
    }
}
