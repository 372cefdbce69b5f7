//! The per-invocation request aggregate.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use ows_common::{OwsError, OwsResult, ProtocolVersion, RequestMethod, ServiceKind};

/// WFS operation data built by the WFS handlers after admission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WfsPayload {
    /// Operation name (GetFeature, Transaction, ...)
    pub operation: String,
    /// Requested feature type names
    pub type_names: Vec<String>,
}

/// WMS operation data built by the WMS handlers after admission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WmsPayload {
    /// Operation name (GetMap, GetCapabilities, ...)
    pub operation: String,
    /// Requested layer names
    pub layers: Vec<String>,
}

/// Service-specific operation data. At most one variant is ever present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "service", content = "data")]
pub enum ServicePayload {
    #[default]
    None,
    Wfs(WfsPayload),
    Wms(WmsPayload),
}

impl ServicePayload {
    fn service(&self) -> ServiceKind {
        match self {
            ServicePayload::None => ServiceKind::Unspecified,
            ServicePayload::Wfs(_) => ServiceKind::Wfs,
            ServicePayload::Wms(_) => ServiceKind::Wms,
        }
    }
}

/// An admitted OWS request.
///
/// Admission fixes `service`, `version` and `method`; the payload is
/// attached afterwards by the service handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwsRequest {
    pub service: ServiceKind,
    pub version: ProtocolVersion,
    pub method: RequestMethod,
    /// Operation named by the REQUEST parameter
    pub operation: String,
    payload: ServicePayload,
}

impl OwsRequest {
    pub fn new(
        service: ServiceKind,
        version: ProtocolVersion,
        method: RequestMethod,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            service,
            version,
            method,
            operation: operation.into(),
            payload: ServicePayload::None,
        }
    }

    pub fn payload(&self) -> &ServicePayload {
        &self.payload
    }

    /// Attach the operation payload. The payload variant has to match the
    /// negotiated service.
    pub fn attach_payload(&mut self, payload: ServicePayload) -> OwsResult<()> {
        if payload.service() != self.service {
            return Err(OwsError::invalid_parameter(
                "service",
                format!(
                    "{} payload does not belong to a {} request",
                    payload.service(),
                    self.service
                ),
            ));
        }
        self.payload = payload;
        Ok(())
    }

    /// Whether the operation matches `name`, ignoring case.
    pub fn is_operation(&self, name: &str) -> bool {
        self.operation.eq_ignore_ascii_case(name)
    }

    /// Dump the negotiated fields at debug level.
    pub fn log_summary(&self) {
        debug!(
            method = %self.method,
            service = %self.service,
            version = %self.version,
            operation = %self.operation,
            "Admitted request"
        );
    }
}

impl fmt::Display for OwsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "method:{} service:{} request:{}",
            self.method, self.service, self.operation
        )?;
        if !self.version.is_unspecified() {
            write!(f, " version:{}", self.version)?;
        }
        Ok(())
    }
}
