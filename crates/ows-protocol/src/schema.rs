//! XML Schema validation of request bodies.
//!
//! The schema engine is pluggable through [`SchemaEngine`]. Engine
//! diagnostics never fail the call: they are forwarded to the server's
//! [`DiagnosticSink`] and the only programmatic signal is the
//! [`ValidationOutcome`].

use metrics::counter;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, warn};

use ows_common::{OwsError, OwsResult};

/// Where the schema comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// A schema file on disk
    File(PathBuf),
    /// An in-memory schema document (e.g. generated from the catalog)
    Memory(String),
}

impl SchemaSource {
    pub fn is_file(&self) -> bool {
        matches!(self, SchemaSource::File(_))
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSource::File(path) => write!(f, "{}", path.display()),
            SchemaSource::Memory(doc) => write!(f, "<in-memory schema, {} bytes>", doc.len()),
        }
    }
}

/// Result of validating one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationOutcome {
    Valid,
    /// The document is malformed or does not conform to the schema
    Invalid,
    /// The schema itself could not be loaded
    SchemaLoadFailed,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        *self == ValidationOutcome::Valid
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationOutcome::Valid => "valid",
            ValidationOutcome::Invalid => "invalid",
            ValidationOutcome::SchemaLoadFailed => "schema_load_failed",
        }
    }

    /// Turn a non-valid outcome into the matching error.
    pub fn into_result(self, locator: &str) -> OwsResult<()> {
        match self {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid => Err(OwsError::DocumentInvalid {
                locator: locator.to_string(),
                message: "document does not conform to the schema".to_string(),
            }),
            ValidationOutcome::SchemaLoadFailed => Err(OwsError::SchemaLoadFailed {
                locator: locator.to_string(),
                message: "schema could not be parsed".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A parser or validator message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "[ERROR]",
            Severity::Warning => "[WARNING]",
        };
        write!(f, "{} {}", tag, self.message)
    }
}

/// Receives diagnostics on behalf of the server context.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing` on the `ows::schema` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Error => error!(target: "ows::schema", "{}", diagnostic),
            Severity::Warning => warn!(target: "ows::schema", "{}", diagnostic),
        }
    }
}

/// An XML Schema engine.
///
/// Handles returned by the engine are owned values; they are dropped before
/// [`validate_document`] returns, whichever step fails.
pub trait SchemaEngine {
    type Schema;
    type Document;

    /// Load and compile a schema. `None` means the schema is unusable.
    fn load_schema(
        &self,
        source: &SchemaSource,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Self::Schema>;

    /// Parse a document. `None` means it is not well-formed.
    fn parse_document(
        &self,
        document: &[u8],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Self::Document>;

    /// Whether the parsed document conforms to the schema.
    fn validate(
        &self,
        schema: &Self::Schema,
        document: &Self::Document,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool;
}

impl<E: SchemaEngine + ?Sized> SchemaEngine for &E {
    type Schema = E::Schema;
    type Document = E::Document;

    fn load_schema(
        &self,
        source: &SchemaSource,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Self::Schema> {
        (**self).load_schema(source, diagnostics)
    }

    fn parse_document(
        &self,
        document: &[u8],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Self::Document> {
        (**self).parse_document(document, diagnostics)
    }

    fn validate(
        &self,
        schema: &Self::Schema,
        document: &Self::Document,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        (**self).validate(schema, document, diagnostics)
    }
}

/// Validate `document` against the schema at `source`.
pub fn validate_document<E>(
    engine: &E,
    source: &SchemaSource,
    document: &[u8],
    sink: &dyn DiagnosticSink,
) -> ValidationOutcome
where
    E: SchemaEngine + ?Sized,
{
    let mut diagnostics = Vec::new();
    let outcome = run_validation(engine, source, document, &mut diagnostics);

    for diagnostic in &diagnostics {
        sink.report(diagnostic);
    }

    debug!(
        schema = %source,
        outcome = outcome.as_str(),
        diagnostics = diagnostics.len(),
        "Schema validation finished"
    );
    counter!("ows_schema_validations_total", "outcome" => outcome.as_str()).increment(1);

    outcome
}

fn run_validation<E>(
    engine: &E,
    source: &SchemaSource,
    document: &[u8],
    diagnostics: &mut Vec<Diagnostic>,
) -> ValidationOutcome
where
    E: SchemaEngine + ?Sized,
{
    let Some(schema) = engine.load_schema(source, diagnostics) else {
        return ValidationOutcome::SchemaLoadFailed;
    };

    let Some(parsed) = engine.parse_document(document, diagnostics) else {
        return ValidationOutcome::Invalid;
    };

    if engine.validate(&schema, &parsed, diagnostics) {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Engine whose every step is scripted.
    struct ScriptedEngine {
        schema_ok: bool,
        document_ok: bool,
        valid: bool,
    }

    impl SchemaEngine for ScriptedEngine {
        type Schema = ();
        type Document = ();

        fn load_schema(&self, _: &SchemaSource, diagnostics: &mut Vec<Diagnostic>) -> Option<()> {
            if !self.schema_ok {
                diagnostics.push(Diagnostic::error("bad schema"));
                return None;
            }
            Some(())
        }

        fn parse_document(&self, _: &[u8], diagnostics: &mut Vec<Diagnostic>) -> Option<()> {
            if !self.document_ok {
                diagnostics.push(Diagnostic::error("not well-formed"));
                return None;
            }
            Some(())
        }

        fn validate(&self, _: &(), _: &(), diagnostics: &mut Vec<Diagnostic>) -> bool {
            if !self.valid {
                diagnostics.push(Diagnostic::warning("element not expected"));
            }
            self.valid
        }
    }

    #[derive(Default)]
    struct CollectingSink(RefCell<Vec<String>>);

    impl DiagnosticSink for CollectingSink {
        fn report(&self, diagnostic: &Diagnostic) {
            self.0.borrow_mut().push(diagnostic.to_string());
        }
    }

    fn run(schema_ok: bool, document_ok: bool, valid: bool) -> (ValidationOutcome, Vec<String>) {
        let engine = ScriptedEngine {
            schema_ok,
            document_ok,
            valid,
        };
        let sink = CollectingSink::default();
        let source = SchemaSource::Memory("<xs:schema/>".to_string());
        let outcome = validate_document(&engine, &source, b"<a/>", &sink);
        (outcome, sink.0.into_inner())
    }

    #[test]
    fn test_outcomes() {
        assert_eq!(run(true, true, true).0, ValidationOutcome::Valid);
        assert_eq!(run(true, true, false).0, ValidationOutcome::Invalid);
        assert_eq!(run(true, false, true).0, ValidationOutcome::Invalid);
        assert_eq!(run(false, true, true).0, ValidationOutcome::SchemaLoadFailed);
    }

    #[test]
    fn test_diagnostics_reach_sink() {
        let (_, lines) = run(false, true, true);
        assert_eq!(lines, vec!["[ERROR] bad schema".to_string()]);

        let (_, lines) = run(true, true, false);
        assert_eq!(lines, vec!["[WARNING] element not expected".to_string()]);

        let (_, lines) = run(true, true, true);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationOutcome::Valid.into_result("request").is_ok());
        assert!(matches!(
            ValidationOutcome::Invalid.into_result("request"),
            Err(OwsError::DocumentInvalid { .. })
        ));
        assert!(matches!(
            ValidationOutcome::SchemaLoadFailed.into_result("request"),
            Err(OwsError::SchemaLoadFailed { .. })
        ));
    }

    #[test]
    fn test_source_kind() {
        assert!(SchemaSource::File(PathBuf::from("wfs.xsd")).is_file());
        assert!(!SchemaSource::Memory(String::new()).is_file());
    }
}
