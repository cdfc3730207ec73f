use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::TenantId;

/// Default cap on tenants with live connections at the same time
pub const DEFAULT_MAX_TENANTS: usize = 32;

/// Default relational pool size per tenant
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Centralized configuration for the owen data layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwenConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub responses: ResponsesConfig,
    pub logging: Option<LoggingConfig>,

    /// One `[[tenant]]` table per company
    #[serde(default, rename = "tenant")]
    pub tenants: Vec<TenantConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Least recently used tenants are disconnected beyond this many
    #[serde(default = "default_max_tenants")]
    pub max_tenants: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_tenants: DEFAULT_MAX_TENANTS,
        }
    }
}

/// How `save_all_responses` folds per-item results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// true when at least one response was saved
    #[default]
    Any,
    /// true only when every response was saved
    All,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsesConfig {
    #[serde(default)]
    pub aggregate: Aggregation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub id: TenantId,
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    pub graph_uri: String,
    pub graph_user: String,
    pub graph_password: String,
}

fn default_max_tenants() -> usize {
    DEFAULT_MAX_TENANTS
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

impl OwenConfig {
    /// Load config from `$OWEN_CONFIG` or ~/.owen/config.toml
    ///
    /// Fails hard with actionable error if config doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            anyhow::bail!(
                "Config not found at {:?}\n\nRun: owenctl config init",
                config_path
            );
        }

        Self::load_from(&config_path)
    }

    /// Load and validate a config file at an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
    }

    /// Parse TOML, expand `${VAR}` references and validate
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).context("Failed to parse config file (invalid TOML)")?;

        config.expand_variables();
        config.validate()?;

        Ok(config)
    }

    /// Get config file path: `$OWEN_CONFIG` or ~/.owen/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var("OWEN_CONFIG") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// ~/.owen
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".owen")
    }

    pub fn tenant(&self, id: TenantId) -> Option<&TenantConfig> {
        self.tenants.iter().find(|t| t.id == id)
    }

    /// Expand ${VAR} references in connection settings from the environment
    fn expand_variables(&mut self) {
        let lookup = |name: &str| env::var(name).ok();
        for tenant in &mut self.tenants {
            tenant.database_url = expand_string(&tenant.database_url, lookup);
            tenant.graph_uri = expand_string(&tenant.graph_uri, lookup);
            tenant.graph_user = expand_string(&tenant.graph_user, lookup);
            tenant.graph_password = expand_string(&tenant.graph_password, lookup);
        }
    }

    /// Check registry bounds and tenant entries
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.registry.max_tenants == 0 {
            errors.push("  ✗ registry.max_tenants must be at least 1".to_string());
        }

        let mut seen = HashSet::new();
        for tenant in &self.tenants {
            if !seen.insert(tenant.id) {
                errors.push(format!("  ✗ tenant {}: declared more than once", tenant.id));
            }
            if tenant.database_url.trim().is_empty() {
                errors.push(format!("  ✗ tenant {}: database_url is empty", tenant.id));
            }
            if tenant.graph_uri.trim().is_empty() {
                errors.push(format!("  ✗ tenant {}: graph_uri is empty", tenant.id));
            }
            if tenant.max_connections == 0 {
                errors.push(format!("  ✗ tenant {}: max_connections must be at least 1", tenant.id));
            }
        }

        if !errors.is_empty() {
            anyhow::bail!("Config validation failed:\n{}", errors.join("\n"));
        }

        Ok(())
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(path, toml_str).context(format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

/// Replace every `${NAME}` with `lookup(NAME)`; unknown names are left as is.
fn expand_string(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => result.push_str(&value),
                    None => {
                        tracing::debug!(variable = name, "config variable not set, left unexpanded");
                        result.push_str(&rest[start..start + 2 + end + 1]);
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);

    result
}
