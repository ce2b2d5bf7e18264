//! Configuration loading and management

use crate::core::access::{AccessPolicy, AccessRule};
use crate::core::auth::DEFAULT_USERNAME_HEADER;
use crate::entities::{Client, Recipe, User};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (e.g., "0.0.0.0:8080")
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Caller identity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Header carrying the authenticated username
    pub username_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username_header: DEFAULT_USERNAME_HEADER.to_string(),
        }
    }
}

/// Access policy as written in YAML
///
/// Either a preset name (`default`, `strict`) or a per-operation table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessConfig {
    Preset(String),
    Table(AccessPolicy),
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig::Preset("default".to_string())
    }
}

impl AccessConfig {
    /// Resolve into a policy
    pub fn policy(&self) -> Result<AccessPolicy> {
        match self {
            AccessConfig::Preset(name) => AccessPolicy::from_preset(name)
                .ok_or_else(|| anyhow!("Unknown access policy preset '{}'", name)),
            AccessConfig::Table(policy) => Ok(*policy),
        }
    }
}

/// Order fixture loaded at start-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOrder {
    pub id: i64,
    pub client_id: i64,
    pub recipe_id: i64,
    #[serde(default = "default_seed_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_seed_quantity() -> i32 {
    1
}

/// Records loaded into the in-memory store before serving
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub clients: Vec<Client>,
    pub recipes: Vec<Recipe>,
    pub orders: Vec<SeedOrder>,
}

impl SeedData {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.clients.is_empty()
            && self.recipes.is_empty()
            && self.orders.is_empty()
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub access: AccessConfig,
    pub seed: SeedData,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path, e))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.access.policy()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::default()),
        }
    }

    /// The configured access policy
    pub fn access_policy(&self) -> Result<AccessPolicy> {
        self.access.policy()
    }

    /// Rule of a single operation, for start-up logging
    pub fn describe_access(&self) -> Result<Vec<(&'static str, AccessRule)>> {
        let policy = self.access_policy()?;
        Ok(vec![
            ("get", policy.get),
            ("list_all", policy.list_all),
            ("list_by_user", policy.list_by_user),
            ("list_by_client", policy.list_by_client),
            ("create", policy.create),
            ("update", policy.update),
            ("delete", policy.delete),
        ])
    }
}
