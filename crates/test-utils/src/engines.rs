//! Test doubles for the schema validation seam.

use std::cell::RefCell;

use ows_protocol::{Diagnostic, DiagnosticSink, SchemaEngine, SchemaSource, ValidationOutcome};

/// Schema engine that records every schema it is asked to load and returns
/// a scripted outcome.
#[derive(Debug)]
pub struct RecordingEngine {
    outcome: ValidationOutcome,
    opened: RefCell<Vec<SchemaSource>>,
}

impl RecordingEngine {
    /// An engine that accepts every document.
    pub fn accepting() -> Self {
        Self::with_outcome(ValidationOutcome::Valid)
    }

    pub fn with_outcome(outcome: ValidationOutcome) -> Self {
        Self {
            outcome,
            opened: RefCell::new(Vec::new()),
        }
    }

    /// Schemas loaded so far, in order.
    pub fn opened(&self) -> Vec<SchemaSource> {
        self.opened.borrow().clone()
    }

    /// Whether any on-disk schema was loaded.
    pub fn opened_file(&self) -> bool {
        self.opened.borrow().iter().any(SchemaSource::is_file)
    }
}

impl SchemaEngine for RecordingEngine {
    type Schema = ();
    type Document = ();

    fn load_schema(
        &self,
        source: &SchemaSource,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<()> {
        self.opened.borrow_mut().push(source.clone());
        if self.outcome == ValidationOutcome::SchemaLoadFailed {
            diagnostics.push(Diagnostic::error("scripted schema failure"));
            return None;
        }
        Some(())
    }

    fn parse_document(&self, _document: &[u8], _diagnostics: &mut Vec<Diagnostic>) -> Option<()> {
        Some(())
    }

    fn validate(&self, _schema: &(), _document: &(), diagnostics: &mut Vec<Diagnostic>) -> bool {
        if self.outcome == ValidationOutcome::Invalid {
            diagnostics.push(Diagnostic::error("scripted validation failure"));
            return false;
        }
        true
    }
}

/// Diagnostic sink that keeps every reported line.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: RefCell<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.lines.borrow_mut().push(diagnostic.to_string());
    }
}
