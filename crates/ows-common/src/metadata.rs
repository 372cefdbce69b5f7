//! Server-wide metadata consulted during admission.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ServiceKind;

/// Deployment-level settings that influence admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerMetadata {
    /// Service type assumed when neither client nor transport names one
    /// ("WMS" or "WFS"; anything else rejects such requests)
    pub default_service: String,

    /// Validate XML-encoded WFS requests against XML schemas
    pub check_schema: bool,

    /// Directory holding the OGC schema sets (`wfs/1.0.0/...`, `wfs/1.1.0/...`)
    pub schema_dir: PathBuf,

    /// Public URL of the service, used in generated schema imports
    pub online_resource: Option<String>,
}

impl ServerMetadata {
    /// The configured default service, if it names a supported dialect.
    pub fn default_service_kind(&self) -> Option<ServiceKind> {
        ServiceKind::from_name(self.default_service.trim())
    }
}

impl Default for ServerMetadata {
    fn default() -> Self {
        Self {
            default_service: "WFS".to_string(),
            check_schema: true,
            schema_dir: PathBuf::from("schema"),
            online_resource: None,
        }
    }
}
