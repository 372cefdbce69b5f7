//! Transaction schema generation.
//!
//! A WFS Transaction embeds features of the server's own feature types, so
//! it cannot be validated against the stock OGC schemas alone. The
//! generated schema imports the version's transaction schema plus, for each
//! namespace in the catalog, the DescribeFeatureType output of its layers.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use ows_common::{LayerCatalog, OwsError, OwsResult, ProtocolVersion, ServerMetadata};

use crate::selection::family_for;
use crate::structural::XSD_NAMESPACE;

pub const WFS_NAMESPACE: &str = "http://www.opengis.net/wfs";

/// Produces an in-memory schema reflecting the live catalog.
pub trait SchemaGenerator {
    fn generate(
        &self,
        catalog: &dyn LayerCatalog,
        metadata: &ServerMetadata,
        version: ProtocolVersion,
    ) -> OwsResult<String>;
}

/// Default generator: imports the OGC transaction schema and one
/// DescribeFeatureType URL per layer namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogSchemaGenerator;

impl SchemaGenerator for CatalogSchemaGenerator {
    fn generate(
        &self,
        catalog: &dyn LayerCatalog,
        metadata: &ServerMetadata,
        version: ProtocolVersion,
    ) -> OwsResult<String> {
        let namespaces = feature_namespaces(catalog);

        let online_resource = match (&metadata.online_resource, namespaces.is_empty()) {
            (Some(url), _) => url.as_str(),
            (None, true) => "",
            (None, false) => {
                return Err(OwsError::config(
                    "online_resource",
                    "No online resource defined",
                ))
            }
        };

        let transaction_schema = metadata
            .schema_dir
            .join(family_for(version).transaction_schema)
            .to_string_lossy()
            .into_owned();
        let version_label = if version.is_unspecified() {
            ProtocolVersion::WFS_1_1_0
        } else {
            version
        };

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        let mut root = BytesStart::new("xs:schema");
        root.push_attribute(("xmlns:xs", XSD_NAMESPACE));
        root.push_attribute(("xmlns:wfs", WFS_NAMESPACE));
        root.push_attribute(("targetNamespace", WFS_NAMESPACE));
        root.push_attribute(("elementFormDefault", "qualified"));
        root.push_attribute(("version", version_label.to_string().as_str()));

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write(&mut writer, Event::Start(root))?;

        let mut import = BytesStart::new("xs:import");
        import.push_attribute(("namespace", WFS_NAMESPACE));
        import.push_attribute(("schemaLocation", transaction_schema.as_str()));
        write(&mut writer, Event::Empty(import))?;

        for (ns_uri, type_names) in &namespaces {
            let location = format!(
                "{}?service=WFS&request=DescribeFeatureType&version={}&typename={}",
                online_resource,
                version_label,
                type_names.join(",")
            );
            let mut import = BytesStart::new("xs:import");
            import.push_attribute(("namespace", ns_uri.as_str()));
            import.push_attribute(("schemaLocation", location.as_str()));
            write(&mut writer, Event::Empty(import))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("xs:schema")))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| OwsError::config("schema", format!("generated schema: {}", e)))
    }
}

/// Table-backed layers grouped by namespace URI, in catalog order.
fn feature_namespaces(catalog: &dyn LayerCatalog) -> Vec<(String, Vec<String>)> {
    let mut namespaces: Vec<(String, Vec<String>)> = Vec::new();

    for layer in catalog.layers() {
        let (Some(name), Some(ns_uri)) = (layer.name.as_deref(), layer.ns_uri.as_deref()) else {
            continue;
        };
        if !catalog.is_table_backed(name) {
            continue;
        }
        let Some(type_name) = layer.type_name() else {
            continue;
        };

        match namespaces.iter_mut().find(|(uri, _)| uri == ns_uri) {
            Some((_, names)) => names.push(type_name),
            None => namespaces.push((ns_uri.to_string(), vec![type_name])),
        }
    }

    namespaces
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> OwsResult<()> {
    writer
        .write_event(event)
        .map_err(|e| OwsError::config("schema", format!("failed to write schema: {}", e)))
}
