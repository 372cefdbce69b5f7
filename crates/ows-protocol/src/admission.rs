//! Request admission.
//!
//! Runs, in order: service/version negotiation, layer catalog checks and,
//! for XML-encoded WFS requests with schema checking enabled, XML Schema
//! validation. The first failure ends admission.

use metrics::counter;
use tracing::{error, info_span, warn};

use ows_common::{
    ErrorClass, LayerCatalog, OwsError, OwsResult, ParamAccessor, RequestMethod, ServerMetadata,
    ServiceKind,
};

use crate::generator::{CatalogSchemaGenerator, SchemaGenerator};
use crate::layers::check_layers;
use crate::negotiate::negotiate;
use crate::request::OwsRequest;
use crate::schema::{validate_document, DiagnosticSink, SchemaEngine, TracingSink};
use crate::selection::select_schema;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP verb the transport received the request with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpVerb {
    Get,
    Post,
    /// Invoked outside HTTP, e.g. from the command line
    #[default]
    None,
}

/// What the transport knows about the inbound request.
#[derive(Debug, Clone, Default)]
pub struct TransportContext {
    pub method: RequestMethod,
    pub verb: HttpVerb,
    pub content_type: Option<String>,
    /// Raw query string or request body
    pub body: Vec<u8>,
}

impl TransportContext {
    /// A URL-encoded GET request.
    pub fn kvp(query: &str) -> Self {
        Self {
            method: RequestMethod::KeyValue,
            verb: HttpVerb::Get,
            content_type: None,
            body: query.as_bytes().to_vec(),
        }
    }

    /// An XML document POSTed with the given content type.
    pub fn xml_post(body: impl Into<Vec<u8>>, content_type: &str) -> Self {
        Self {
            method: RequestMethod::XmlBody,
            verb: HttpVerb::Post,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    /// Whether the request body is an XML document.
    ///
    /// POSTs are XML unless form-encoded; outside HTTP the raw query has to
    /// start with `<`.
    pub fn is_xml_bodied(&self) -> bool {
        match self.verb {
            HttpVerb::Post => !self
                .content_type
                .as_deref()
                .map(media_type)
                .is_some_and(|mt| mt.eq_ignore_ascii_case(FORM_URLENCODED)),
            HttpVerb::Get => false,
            HttpVerb::None => self.body.first() == Some(&b'<'),
        }
    }
}

/// `type/subtype` without parameters such as `; charset=UTF-8`.
fn media_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

/// Entry point for admitting requests against one server configuration.
///
/// Holds no per-request state; one controller serves any number of
/// admissions, and identical inputs always give identical outcomes.
pub struct AdmissionController<'a, E> {
    metadata: &'a ServerMetadata,
    catalog: &'a dyn LayerCatalog,
    engine: E,
    generator: &'a dyn SchemaGenerator,
    sink: &'a dyn DiagnosticSink,
}

impl<'a, E: SchemaEngine> AdmissionController<'a, E> {
    pub fn new(metadata: &'a ServerMetadata, catalog: &'a dyn LayerCatalog, engine: E) -> Self {
        Self {
            metadata,
            catalog,
            engine,
            generator: &CatalogSchemaGenerator,
            sink: &TracingSink,
        }
    }

    pub fn with_generator(mut self, generator: &'a dyn SchemaGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Admit one request or explain why it is refused.
    pub fn admit<P>(&self, params: &P, transport: &TransportContext) -> OwsResult<OwsRequest>
    where
        P: ParamAccessor + ?Sized,
    {
        let span = info_span!("admission", method = %transport.method);
        let _enter = span.enter();

        match self.run(params, transport) {
            Ok(request) => {
                request.log_summary();
                counter!("ows_admission_total", "outcome" => "admitted").increment(1);
                Ok(request)
            }
            Err(refusal) => {
                refusal.log();
                counter!("ows_admission_total", "outcome" => refusal.outcome()).increment(1);
                Err(refusal.error)
            }
        }
    }

    fn run<P>(&self, params: &P, transport: &TransportContext) -> Result<OwsRequest, Refusal>
    where
        P: ParamAccessor + ?Sized,
    {
        let request = negotiate(params, self.metadata, transport.method)?;

        check_layers(self.catalog, request.service, params)?;

        if request.service == ServiceKind::Wfs
            && self.metadata.check_schema
            && transport.is_xml_bodied()
        {
            self.check_schema(&request, &transport.body)?;
        }

        Ok(request)
    }

    fn check_schema(&self, request: &OwsRequest, body: &[u8]) -> Result<(), Refusal> {
        let source = select_schema(
            request.version,
            &request.operation,
            self.metadata,
            self.catalog,
            self.generator,
        )?;

        validate_document(&self.engine, &source, body, self.sink)
            .into_result(&source.to_string())
            .map_err(|cause| Refusal {
                error: OwsError::invalid_parameter("request", "xml isn't valid"),
                cause: Some(cause),
            })
    }
}

/// A refused admission: the error reported to the client plus, for schema
/// failures, the underlying validation error.
#[derive(Debug)]
struct Refusal {
    error: OwsError,
    cause: Option<OwsError>,
}

impl From<OwsError> for Refusal {
    fn from(error: OwsError) -> Self {
        Self { error, cause: None }
    }
}

impl Refusal {
    /// The error that decides who is at fault.
    fn root(&self) -> &OwsError {
        self.cause.as_ref().unwrap_or(&self.error)
    }

    /// `outcome` label of `ows_admission_total`.
    fn outcome(&self) -> &'static str {
        match self.root() {
            OwsError::Config { .. } => "config_error",
            OwsError::SchemaLoadFailed { .. } => "schema_error",
            _ => "client_error",
        }
    }

    fn log(&self) {
        let err = &self.error;
        let root = self.root();
        match root.class() {
            ErrorClass::Server => error!(
                code = err.exception_code(),
                locator = err.locator(),
                cause = %root,
                "Request refused by server configuration: {}",
                err
            ),
            ErrorClass::Client => warn!(
                code = err.exception_code(),
                locator = err.locator(),
                cause = %root,
                "Request refused: {}",
                err
            ),
        }
    }
}
