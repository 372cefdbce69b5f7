//! Service dialects and request encodings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// OGC service dialect governing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ServiceKind {
    Wms,
    Wfs,
    #[default]
    Unspecified,
}

impl ServiceKind {
    /// Match a supported dialect name, ignoring case. WCS and anything else
    /// yield `None`; callers decide how to reject them.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("WMS") {
            Some(ServiceKind::Wms)
        } else if name.eq_ignore_ascii_case("WFS") {
            Some(ServiceKind::Wfs)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Wms => "WMS",
            ServiceKind::Wfs => "WFS",
            ServiceKind::Unspecified => "UNSPECIFIED",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the request parameters were encoded by the client.
///
/// Resolved by the transport before admission runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RequestMethod {
    /// URL key/value pairs (KVP)
    KeyValue,
    /// XML document body
    XmlBody,
    #[default]
    Unspecified,
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestMethod::KeyValue => "KVP",
            RequestMethod::XmlBody => "XML",
            RequestMethod::Unspecified => "UNSPECIFIED",
        };
        f.write_str(name)
    }
}
