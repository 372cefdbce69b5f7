//! SERVICE / REQUEST / VERSION negotiation.
//!
//! OGC specification versions disagree on what clients must send:
//! - KVP requests have to carry SERVICE, and VERSION for anything but
//!   GetCapabilities.
//! - XML-encoded requests may omit SERVICE (the server's declared type
//!   applies) and VERSION (WFS defaults to 1.1.0, WMS to 1.3.0).
//! - GetCapabilities without VERSION stays unversioned so the response can
//!   advertise every supported version.

use tracing::debug;

use ows_common::{
    OwsError, OwsResult, ParamAccessor, ProtocolVersion, RequestMethod, ServerMetadata,
    ServiceKind,
};

use crate::request::OwsRequest;

const GET_CAPABILITIES: &str = "GetCapabilities";

/// Resolve service, operation and version into a fresh [`OwsRequest`].
pub fn negotiate<P>(
    params: &P,
    metadata: &ServerMetadata,
    method: RequestMethod,
) -> OwsResult<OwsRequest>
where
    P: ParamAccessor + ?Sized,
{
    let service = resolve_service(params, metadata, method)?;

    let operation = params
        .get("request")
        .ok_or_else(|| OwsError::missing_parameter("REQUEST", "REQUEST is not set"))?;

    let version = resolve_version(params, service, method, operation)?;

    debug!(
        service = %service,
        version = %version,
        method = %method,
        operation = operation,
        "Negotiated request"
    );

    Ok(OwsRequest::new(service, version, method, operation))
}

/// Work out which service dialect governs the request.
pub fn resolve_service<P>(
    params: &P,
    metadata: &ServerMetadata,
    method: RequestMethod,
) -> OwsResult<ServiceKind>
where
    P: ParamAccessor + ?Sized,
{
    let requested = match params.get("service") {
        Some(value) => value,
        None if method == RequestMethod::KeyValue => {
            return Err(OwsError::missing_parameter("SERVICE", "SERVICE is not set"));
        }
        None => return default_service(metadata),
    };

    if let Some(service) = ServiceKind::from_name(requested) {
        return Ok(service);
    }

    if requested.eq_ignore_ascii_case("WCS") {
        Err(OwsError::invalid_parameter(
            "service",
            "service not implemented",
        ))
    } else if requested.is_empty() {
        default_service(metadata)
    } else {
        Err(OwsError::invalid_parameter("service", "service unknown"))
    }
}

fn default_service(metadata: &ServerMetadata) -> OwsResult<ServiceKind> {
    metadata
        .default_service_kind()
        .ok_or_else(|| OwsError::invalid_parameter("service", "service unknown"))
}

/// Work out the protocol version, applying the encoding-dependent defaults.
pub fn resolve_version<P>(
    params: &P,
    service: ServiceKind,
    method: RequestMethod,
    operation: &str,
) -> OwsResult<ProtocolVersion>
where
    P: ParamAccessor + ?Sized,
{
    let raw = params.get_or_empty("version");

    if !raw.is_empty() {
        return ProtocolVersion::parse(raw).map_err(|_| {
            OwsError::invalid_parameter("version", "VERSION parameter is not valid (use x.y.z)")
        });
    }

    if operation.eq_ignore_ascii_case(GET_CAPABILITIES) {
        return Ok(ProtocolVersion::UNSPECIFIED);
    }

    match (method, service) {
        (RequestMethod::KeyValue, _) => {
            Err(OwsError::missing_parameter("VERSION", "VERSION is not set"))
        }
        (RequestMethod::XmlBody, ServiceKind::Wfs) => Ok(ProtocolVersion::WFS_1_1_0),
        (RequestMethod::XmlBody, ServiceKind::Wms) => Ok(ProtocolVersion::WMS_1_3_0),
        _ => Ok(ProtocolVersion::UNSPECIFIED),
    }
}
