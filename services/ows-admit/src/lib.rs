//! Command-line front end for OWS request admission.
//!
//! Loads a server configuration, admits one request and reports the
//! admitted request or the refusal as JSON.

pub mod config;

use serde::Serialize;

use ows_common::{OwsError, RequestParams};
use ows_protocol::{AdmissionController, OwsRequest, StructuralEngine, TransportContext};

use crate::config::ServerConfig;

/// JSON report printed by the CLI.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdmissionReport {
    Admitted {
        request: OwsRequest,
    },
    Refused {
        kind: &'static str,
        code: &'static str,
        locator: String,
        message: String,
        http_status: u16,
    },
}

impl AdmissionReport {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionReport::Admitted { .. })
    }
}

impl From<Result<OwsRequest, OwsError>> for AdmissionReport {
    fn from(result: Result<OwsRequest, OwsError>) -> Self {
        match result {
            Ok(request) => AdmissionReport::Admitted { request },
            Err(err) => AdmissionReport::Refused {
                kind: err.kind(),
                code: err.exception_code(),
                locator: err.locator().to_string(),
                message: err.message().to_string(),
                http_status: err.http_status_code(),
            },
        }
    }
}

/// Build the transport context for a CLI invocation.
///
/// With a body the request is treated as an XML POST; without one, as a
/// KVP GET of `query`.
pub fn transport_for(query: &str, body: Option<Vec<u8>>, content_type: &str) -> TransportContext {
    match body {
        Some(body) => TransportContext::xml_post(body, content_type),
        None => TransportContext::kvp(query),
    }
}

/// Admit one request against `config` with the structural schema engine.
pub fn admit(
    config: &ServerConfig,
    params: &RequestParams,
    transport: &TransportContext,
) -> AdmissionReport {
    let controller = AdmissionController::new(&config.metadata, &config.catalog, StructuralEngine);
    controller.admit(params, transport).into()
}
