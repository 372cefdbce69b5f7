//! Common types shared by the OWS admission crates.

pub mod error;
pub mod layer;
pub mod metadata;
pub mod params;
pub mod service;
pub mod srs;
pub mod version;

pub use error::{ErrorClass, OwsError, OwsResult};
pub use layer::{LayerCatalog, LayerConfig, StaticCatalog};
pub use metadata::ServerMetadata;
pub use params::{ParamAccessor, ParamsError, RequestParams};
pub use service::{RequestMethod, ServiceKind};
pub use version::{ProtocolVersion, VersionParseError};
