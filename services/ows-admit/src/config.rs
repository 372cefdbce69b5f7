//! Server configuration loader.
//!
//! One YAML file holds the server metadata and the layer catalog:
//!
//! ```yaml
//! metadata:
//!   default_service: WFS
//!   check_schema: true
//!   schema_dir: ${OWS_SCHEMA_ROOT:-/usr/local/share/tinyows/schema}
//!   online_resource: http://localhost/cgi-bin/tinyows
//! layers:
//!   - name: roads
//!     title: Roads
//!     prefix: tows
//!     ns_uri: http://www.tinyows.org/
//!     server: postgis
//!     srid: ["^EPSG:4326$"]
//! tables: [roads]
//! ```
//!
//! Supports environment variable substitution using ${VAR} syntax, and
//! `OWS_DEFAULT_SERVICE`, `OWS_CHECK_SCHEMA` and `OWS_SCHEMA_DIR` override
//! the metadata after parsing.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use ows_common::{LayerCatalog, ServerMetadata, StaticCatalog};

/// Everything admission needs from the deployment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub metadata: ServerMetadata,

    #[serde(flatten)]
    pub catalog: StaticCatalog,
}

impl ServerConfig {
    /// Load the configuration file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = load_server_config(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `OWS_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(service) = lookup("OWS_DEFAULT_SERVICE") {
            self.metadata.default_service = service;
        }
        if let Some(check) = lookup("OWS_CHECK_SCHEMA") {
            self.metadata.check_schema = check.to_lowercase() == "true" || check == "1";
        }
        if let Some(dir) = lookup("OWS_SCHEMA_DIR") {
            self.metadata.schema_dir = PathBuf::from(dir);
        }
    }
}

/// Load and parse the server configuration with environment variable
/// substitution.
pub fn load_server_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read server config from {:?}", path.as_ref()))?;

    let expanded = expand_env_vars(&content)?;

    let config: ServerConfig = serde_yaml::from_str(&expanded)
        .with_context(|| format!("Failed to parse server config {:?}", path.as_ref()))?;

    info!(
        layers = config.catalog.layers().len(),
        tables = config.catalog.tables.len(),
        default_service = %config.metadata.default_service,
        "Loaded server config from {:?}",
        path.as_ref()
    );

    Ok(config)
}

/// Expand environment variables in content.
/// Supports ${VAR} and ${VAR:-default} syntax
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}
