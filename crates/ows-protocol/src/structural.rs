//! Structural schema engine built on quick-xml.
//!
//! This engine does not implement the full XML Schema type system. It
//! checks that the schema and the document are well-formed and that the
//! document's root element is something the schema declares:
//! - the root's namespace is the schema's `targetNamespace` or one of the
//!   namespaces it imports, and
//! - if the schema declares global elements, a root in the target
//!   namespace has to be one of them.
//!
//! A full XSD engine can be used instead through [`SchemaEngine`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;

use crate::schema::{Diagnostic, SchemaEngine, SchemaSource};

pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// What the engine retains from a loaded schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaOutline {
    pub target_namespace: Option<String>,
    pub imported_namespaces: Vec<String>,
    pub global_elements: Vec<String>,
}

/// The root element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRoot {
    pub local_name: String,
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEngine;

impl StructuralEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaEngine for StructuralEngine {
    type Schema = SchemaOutline;
    type Document = DocumentRoot;

    fn load_schema(
        &self,
        source: &SchemaSource,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<SchemaOutline> {
        let text = match source {
            SchemaSource::File(path) => match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    diagnostics.push(Diagnostic::error(format!(
                        "failed to read schema {}: {}",
                        path.display(),
                        e
                    )));
                    return None;
                }
            },
            SchemaSource::Memory(text) => text.clone(),
        };

        match outline_schema(&text) {
            Ok(outline) => Some(outline),
            Err(message) => {
                diagnostics.push(Diagnostic::error(format!("schema {}: {}", source, message)));
                None
            }
        }
    }

    fn parse_document(
        &self,
        document: &[u8],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<DocumentRoot> {
        let text = match std::str::from_utf8(document) {
            Ok(text) => text,
            Err(e) => {
                diagnostics.push(Diagnostic::error(format!("document is not UTF-8: {}", e)));
                return None;
            }
        };

        match scan(text) {
            Ok(root) => Some(DocumentRoot {
                local_name: root.local_name,
                namespace: root.namespace,
            }),
            Err(message) => {
                diagnostics.push(Diagnostic::error(message));
                None
            }
        }
    }

    fn validate(
        &self,
        schema: &SchemaOutline,
        document: &DocumentRoot,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        let namespace = document.namespace.as_deref();

        if namespace.is_some() && namespace == schema.target_namespace.as_deref() {
            if schema.global_elements.is_empty()
                || schema.global_elements.contains(&document.local_name)
            {
                return true;
            }
            diagnostics.push(Diagnostic::error(format!(
                "element '{}': no matching global declaration available",
                document.local_name
            )));
            return false;
        }

        if let Some(ns) = namespace {
            if schema.imported_namespaces.iter().any(|i| i == ns) {
                return true;
            }
        }

        diagnostics.push(Diagnostic::error(format!(
            "element '{}' in namespace '{}' is not declared by the schema",
            document.local_name,
            namespace.unwrap_or("")
        )));
        false
    }
}

/// Root element details plus the direct children of the root.
struct Scanned {
    local_name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<Child>,
}

struct Child {
    local_name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
}

struct Element {
    prefix: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    fn read(e: &BytesStart<'_>) -> Result<Self, String> {
        let name = e.name();
        let prefix = name
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
        let local_name = String::from_utf8_lossy(name.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| format!("bad attribute: {}", e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| format!("bad attribute value: {}", e))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            prefix,
            local_name,
            attributes,
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        find_attribute(&self.attributes, key)
    }

    /// Resolve the element's namespace from its own declarations, then the
    /// root's.
    fn namespace(&self, root_attributes: &[(String, String)]) -> Option<String> {
        let key = match &self.prefix {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        self.attribute(&key)
            .or_else(|| find_attribute(root_attributes, &key))
            .filter(|ns| !ns.is_empty())
            .map(str::to_string)
    }
}

fn find_attribute<'a>(attributes: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Walk a whole document, failing on anything that is not well-formed.
fn scan(text: &str) -> Result<Scanned, String> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut root: Option<Scanned> = None;
    let mut depth = 0usize;
    let mut closed = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("XML parsing error at position {}: {}", reader.buffer_position(), e))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                if closed {
                    return Err("extra content after the root element".to_string());
                }
                let element = Element::read(e)?;

                match depth {
                    0 => {
                        let namespace = element.namespace(&[]);
                        root = Some(Scanned {
                            local_name: element.local_name,
                            namespace,
                            attributes: element.attributes,
                            children: Vec::new(),
                        });
                    }
                    1 => {
                        if let Some(root) = root.as_mut() {
                            let namespace = element.namespace(&root.attributes);
                            root.children.push(Child {
                                local_name: element.local_name,
                                namespace,
                                attributes: element.attributes,
                            });
                        }
                    }
                    _ => {}
                }

                if is_empty {
                    if depth == 0 {
                        closed = true;
                    }
                } else {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    closed = true;
                }
            }
            Event::Text(t) => {
                if depth == 0 {
                    let content = t.unescape().map_err(|e| e.to_string())?;
                    if !content.trim().is_empty() {
                        return Err("text outside the root element".to_string());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match root {
        None => Err("document is empty".to_string()),
        Some(_) if !closed || depth != 0 => Err("document is truncated".to_string()),
        Some(root) => Ok(root),
    }
}

fn outline_schema(text: &str) -> Result<SchemaOutline, String> {
    let root = scan(text)?;

    if root.local_name != "schema" || root.namespace.as_deref() != Some(XSD_NAMESPACE) {
        return Err(format!("root element '{}' is not xs:schema", root.local_name));
    }

    let target_namespace = find_attribute(&root.attributes, "targetNamespace")
        .filter(|ns| !ns.is_empty())
        .map(str::to_string);

    let mut outline = SchemaOutline {
        target_namespace,
        ..SchemaOutline::default()
    };

    for child in &root.children {
        if child.namespace.as_deref() != Some(XSD_NAMESPACE) {
            continue;
        }
        match child.local_name.as_str() {
            "import" => {
                if let Some(ns) = find_attribute(&child.attributes, "namespace") {
                    outline.imported_namespaces.push(ns.to_string());
                }
            }
            "element" => {
                if let Some(name) = find_attribute(&child.attributes, "name") {
                    outline.global_elements.push(name.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(outline)
}
