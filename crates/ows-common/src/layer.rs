//! Layer catalog as configured by the server operator.
//!
//! The catalog is loaded once at startup and is read-only afterwards.
//! Admission only inspects it; it never mutates layers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A configured layer.
///
/// Every field is optional at the type level: a missing name or title is
/// a deployment defect reported by admission, not a load failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Layer name, matched against the TYPENAME parameter
    #[serde(default)]
    pub name: Option<String>,

    /// Human-readable title for capabilities documents
    #[serde(default)]
    pub title: Option<String>,

    /// Namespace prefix used in WFS feature type names
    #[serde(default)]
    pub prefix: Option<String>,

    /// Namespace URI bound to `prefix`
    #[serde(default)]
    pub ns_uri: Option<String>,

    /// Reference to the backing data server
    #[serde(default)]
    pub server: Option<String>,

    /// SRID patterns accepted for SRSNAME, in declaration order
    #[serde(default)]
    pub srid: Vec<String>,
}

impl LayerConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Qualified feature type name, `prefix:name` when a prefix is set.
    pub fn type_name(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        Some(match self.prefix.as_deref() {
            Some(prefix) => format!("{}:{}", prefix, name),
            None => name.to_string(),
        })
    }
}

/// Read-only access to the configured layers.
pub trait LayerCatalog {
    /// Layers in configuration order.
    fn layers(&self) -> &[LayerConfig];

    /// Whether a layer is backed by a queryable table.
    fn is_table_backed(&self, name: &str) -> bool;
}

/// A catalog held entirely in memory, typically deserialized from config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub layers: Vec<LayerConfig>,

    /// Names of the layers backed by a table
    #[serde(default)]
    pub tables: HashSet<String>,
}

impl StaticCatalog {
    pub fn new(layers: Vec<LayerConfig>) -> Self {
        Self {
            layers,
            tables: HashSet::new(),
        }
    }

    /// Mark a layer name as table-backed.
    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.tables.insert(name.into());
        self
    }
}

impl LayerCatalog for StaticCatalog {
    fn layers(&self) -> &[LayerConfig] {
        &self.layers
    }

    fn is_table_backed(&self, name: &str) -> bool {
        self.tables.contains(name)
    }
}
