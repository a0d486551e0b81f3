//! Loader and ingestion configuration.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{ChainGraphError, Result};
use crate::mutation::DEFAULT_WEIGHT_PROPERTY;

/// What to do with a record whose node or relationship already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Always create. Re-running a load duplicates every node and relationship.
    #[default]
    Create,
    /// Skip records whose node (label + name) or relationship already exists.
    SkipExisting,
}

impl FromStr for DuplicatePolicy {
    type Err = ChainGraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(DuplicatePolicy::Create),
            "skip" | "skip_existing" => Ok(DuplicatePolicy::SkipExisting),
            other => Err(ChainGraphError::Validation(format!(
                "DUPLICATE_POLICY must be `create` or `skip`, got `{other}`"
            ))),
        }
    }
}

/// Per-run ingestion behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IngestionConfig {
    /// Relationship property carrying the company–product weight.
    #[validate(length(min = 1))]
    pub weight_property: String,

    pub duplicate_policy: DuplicatePolicy,

    /// Look both endpoints up before creating a relationship.
    pub verify_endpoints: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            weight_property: DEFAULT_WEIGHT_PROPERTY.to_string(),
            duplicate_policy: DuplicatePolicy::Create,
            verify_endpoints: true,
        }
    }
}

/// Central configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoaderConfig {
    /// Neo4j connection URI (e.g. `bolt://localhost:7687`).
    #[validate(length(min = 1))]
    pub neo4j_uri: String,

    /// Neo4j username.
    pub neo4j_user: String,

    /// Neo4j password.
    #[validate(length(min = 1))]
    pub neo4j_password: String,

    /// Directory holding the record sources.
    pub data_dir: PathBuf,

    #[validate(nested)]
    pub ingestion: IngestionConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            neo4j_uri: "bolt://localhost:7687".to_string(),
            neo4j_user: "neo4j".to_string(),
            neo4j_password: String::new(),
            data_dir: PathBuf::from("data"),
            ingestion: IngestionConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` first (non-fatal if `.env` is absent),
    /// then reads each variable from the process environment. `NEO4J_PASSWORD`
    /// is required; every other variable has a default.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let neo4j_password = lookup("NEO4J_PASSWORD").ok_or_else(|| {
            ChainGraphError::Validation("NEO4J_PASSWORD is required".to_string())
        })?;

        let duplicate_policy = match lookup("DUPLICATE_POLICY") {
            Some(val) => val.parse()?,
            None => defaults.ingestion.duplicate_policy,
        };

        let verify_endpoints = match lookup("VERIFY_ENDPOINTS") {
            Some(val) => parse_bool("VERIFY_ENDPOINTS", &val)?,
            None => defaults.ingestion.verify_endpoints,
        };

        let config = Self {
            neo4j_uri: lookup("NEO4J_URI").unwrap_or(defaults.neo4j_uri),
            neo4j_user: lookup("NEO4J_USER").unwrap_or(defaults.neo4j_user),
            neo4j_password,
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            ingestion: IngestionConfig {
                weight_property: lookup("WEIGHT_PROPERTY")
                    .unwrap_or(defaults.ingestion.weight_property),
                duplicate_policy,
                verify_endpoints,
            },
        };

        config
            .validate()
            .map_err(|e| ChainGraphError::Validation(e.to_string()))?;

        Ok(config)
    }
}

fn parse_bool(name: &str, val: &str) -> Result<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ChainGraphError::Validation(format!(
            "{name} must be a boolean, got `{val}`"
        ))),
    }
}
