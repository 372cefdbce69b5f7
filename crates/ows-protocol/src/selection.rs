//! Schema selection for XML-encoded WFS requests.
//!
//! Transactions are validated against a schema generated from the live
//! layer catalog; every other operation against the fixed "basic" schema of
//! its version family.

use tracing::debug;

use ows_common::{LayerCatalog, OwsResult, ProtocolVersion, ServerMetadata};

use crate::generator::SchemaGenerator;
use crate::schema::SchemaSource;

pub const TRANSACTION: &str = "Transaction";

/// Schema files of one WFS version family, relative to the schema directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaFamily {
    pub basic_schema: &'static str,
    pub transaction_schema: &'static str,
}

const WFS_1_0_0: SchemaFamily = SchemaFamily {
    basic_schema: "wfs/1.0.0/WFS-basic.xsd",
    transaction_schema: "wfs/1.0.0/WFS-transaction.xsd",
};

const WFS_1_1_0: SchemaFamily = SchemaFamily {
    basic_schema: "wfs/1.1.0/wfs.xsd",
    transaction_schema: "wfs/1.1.0/wfs.xsd",
};

/// Families keyed by version ordinal; anything unlisted uses 1.1.0.
const FAMILIES: &[(u64, SchemaFamily)] = &[(100, WFS_1_0_0)];

pub fn family_for(version: ProtocolVersion) -> &'static SchemaFamily {
    let ordinal = version.ordinal();
    FAMILIES
        .iter()
        .find(|(o, _)| *o == ordinal)
        .map(|(_, family)| family)
        .unwrap_or(&WFS_1_1_0)
}

/// Pick the schema an XML-encoded WFS request is validated against.
pub fn select_schema(
    version: ProtocolVersion,
    operation: &str,
    metadata: &ServerMetadata,
    catalog: &dyn LayerCatalog,
    generator: &dyn SchemaGenerator,
) -> OwsResult<SchemaSource> {
    if operation == TRANSACTION {
        debug!(version = %version, "Generating transaction schema from the layer catalog");
        let schema = generator.generate(catalog, metadata, version)?;
        return Ok(SchemaSource::Memory(schema));
    }

    let family = family_for(version);
    Ok(SchemaSource::File(metadata.schema_dir.join(family.basic_schema)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ows_common::StaticCatalog;
    use std::path::PathBuf;

    struct FixedGenerator;

    impl SchemaGenerator for FixedGenerator {
        fn generate(
            &self,
            _catalog: &dyn LayerCatalog,
            _metadata: &ServerMetadata,
            version: ProtocolVersion,
        ) -> OwsResult<String> {
            Ok(format!("<generated version=\"{}\"/>", version))
        }
    }

    fn metadata() -> ServerMetadata {
        ServerMetadata {
            schema_dir: PathBuf::from("/usr/share/ows/schema"),
            ..ServerMetadata::default()
        }
    }

    #[test]
    fn test_family_table() {
        assert_eq!(family_for(ProtocolVersion::WFS_1_0_0), &WFS_1_0_0);
        assert_eq!(family_for(ProtocolVersion::WFS_1_1_0), &WFS_1_1_0);
        assert_eq!(family_for(ProtocolVersion::UNSPECIFIED), &WFS_1_1_0);
        assert_eq!(family_for(ProtocolVersion::new(2, 0, 0)), &WFS_1_1_0);
        assert_eq!(family_for(ProtocolVersion::new(1_073_741_825, 0, 0)), &WFS_1_1_0);
        assert_eq!(family_for(ProtocolVersion::new(u32::MAX, 0, 0)), &WFS_1_1_0);
    }

    #[test]
    fn test_basic_schema_paths() {
        let catalog = StaticCatalog::default();
        let source = select_schema(
            ProtocolVersion::WFS_1_0_0,
            "GetFeature",
            &metadata(),
            &catalog,
            &FixedGenerator,
        )
        .unwrap();
        assert_eq!(
            source,
            SchemaSource::File(PathBuf::from("/usr/share/ows/schema/wfs/1.0.0/WFS-basic.xsd"))
        );

        let source = select_schema(
            ProtocolVersion::WFS_1_1_0,
            "GetFeature",
            &metadata(),
            &catalog,
            &FixedGenerator,
        )
        .unwrap();
        assert_eq!(
            source,
            SchemaSource::File(PathBuf::from("/usr/share/ows/schema/wfs/1.1.0/wfs.xsd"))
        );
    }

    #[test]
    fn test_transaction_uses_generator() {
        let catalog = StaticCatalog::default();
        for version in [ProtocolVersion::WFS_1_0_0, ProtocolVersion::WFS_1_1_0] {
            let source =
                select_schema(version, TRANSACTION, &metadata(), &catalog, &FixedGenerator)
                    .unwrap();
            assert_eq!(
                source,
                SchemaSource::Memory(format!("<generated version=\"{}\"/>", version))
            );
        }
    }
}
