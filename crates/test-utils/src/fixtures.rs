//! Common test fixtures for admission tests.
//!
//! This module provides pre-defined server configurations that represent
//! common deployment scenarios.

use std::fs;
use std::io;
use std::path::Path;

use ows_common::{LayerConfig, ServerMetadata, StaticCatalog};
use tempfile::TempDir;

/// Namespace used by the fixture layers.
pub const TOWS_NS: &str = "http://www.tinyows.org/";

/// A fully configured, table-backed WFS layer.
pub fn wfs_layer(name: &str, srid: &[&str]) -> LayerConfig {
    LayerConfig {
        name: Some(name.to_string()),
        title: Some(format!("{} layer", name)),
        prefix: Some("tows".to_string()),
        ns_uri: Some(TOWS_NS.to_string()),
        server: Some("postgis".to_string()),
        srid: srid.iter().map(|s| s.to_string()).collect(),
    }
}

/// Catalog with two table-backed layers: `roads` (EPSG:4326 only) and
/// `rivers` (EPSG:4326 and EPSG:3857).
pub fn sample_catalog() -> StaticCatalog {
    StaticCatalog::new(vec![
        wfs_layer("roads", &["^EPSG:4326$"]),
        wfs_layer("rivers", &["^EPSG:4326$", "^EPSG:3857$"]),
    ])
    .with_table("roads")
    .with_table("rivers")
}

/// Server metadata declaring `default_service`, schema checking on.
pub fn metadata(default_service: &str) -> ServerMetadata {
    ServerMetadata {
        default_service: default_service.to_string(),
        check_schema: true,
        schema_dir: "/usr/local/share/tinyows/schema".into(),
        online_resource: Some("http://localhost/cgi-bin/tinyows".to_string()),
    }
}

/// Minimal stand-ins for the OGC WFS schema sets, enough for the
/// structural engine: the basic schemas declare the read-only operations.
pub mod schemas {
    pub const WFS_100_BASIC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://www.opengis.net/wfs"
            version="1.0.0">
  <xsd:import namespace="http://www.opengis.net/ogc" schemaLocation="../../filter/1.0.0/filter.xsd"/>
  <xsd:element name="GetCapabilities" type="xsd:anyType"/>
  <xsd:element name="DescribeFeatureType" type="xsd:anyType"/>
  <xsd:element name="GetFeature" type="xsd:anyType"/>
</xsd:schema>"#;

    pub const WFS_110: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://www.opengis.net/wfs"
            version="1.1.0">
  <xsd:import namespace="http://www.opengis.net/ogc" schemaLocation="../../filter/1.1.0/filter.xsd"/>
  <xsd:element name="GetCapabilities" type="xsd:anyType"/>
  <xsd:element name="DescribeFeatureType" type="xsd:anyType"/>
  <xsd:element name="GetFeature" type="xsd:anyType"/>
  <xsd:element name="GetGmlObject" type="xsd:anyType"/>
  <xsd:element name="LockFeature" type="xsd:anyType"/>
  <xsd:element name="Transaction" type="xsd:anyType"/>
</xsd:schema>"#;
}

/// Create a temporary schema directory laid out like the OGC schema sets.
pub fn schema_dir() -> io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    write_schema(dir.path(), "wfs/1.0.0/WFS-basic.xsd", schemas::WFS_100_BASIC)?;
    write_schema(dir.path(), "wfs/1.1.0/wfs.xsd", schemas::WFS_110)?;
    Ok(dir)
}

fn write_schema(root: &Path, relative: &str, content: &str) -> io::Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ows_common::LayerCatalog;

    #[test]
    fn test_sample_catalog_is_table_backed() {
        let catalog = sample_catalog();
        assert_eq!(catalog.layers().len(), 2);
        assert!(catalog.is_table_backed("roads"));
        assert!(catalog.is_table_backed("rivers"));
    }

    #[test]
    fn test_schema_dir_layout() {
        let dir = schema_dir().unwrap();
        assert!(dir.path().join("wfs/1.0.0/WFS-basic.xsd").is_file());
        assert!(dir.path().join("wfs/1.1.0/wfs.xsd").is_file());
    }
}
