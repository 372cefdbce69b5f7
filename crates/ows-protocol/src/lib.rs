//! OGC WMS/WFS request admission.
//!
//! Decides, before any operation handler runs, whether a request is a
//! well-formed invocation the server is configured to honor:
//! - SERVICE / REQUEST / VERSION negotiation
//! - layer catalog consistency and SRSNAME checks
//! - XML Schema validation of XML-encoded WFS requests

pub mod admission;
pub mod generator;
pub mod layers;
pub mod negotiate;
pub mod request;
pub mod schema;
pub mod selection;
pub mod structural;

pub use admission::{AdmissionController, HttpVerb, TransportContext};
pub use generator::{CatalogSchemaGenerator, SchemaGenerator};
pub use layers::check_layers;
pub use negotiate::negotiate;
pub use request::{OwsRequest, ServicePayload, WfsPayload, WmsPayload};
pub use schema::{
    validate_document, Diagnostic, DiagnosticSink, SchemaEngine, SchemaSource, Severity,
    TracingSink, ValidationOutcome,
};
pub use selection::{family_for, select_schema, SchemaFamily};
pub use structural::StructuralEngine;
