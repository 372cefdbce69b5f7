//! OWS protocol version handling.
//!
//! OGC services identify protocol versions as `x.y.z`. The server only ever
//! compares versions by family ("1.0.0 vs 1.1.0"), so a version also encodes
//! to a single ordinal `major * 100 + minor * 10 + patch`. That encoding is
//! only unambiguous while minor and patch stay below 10, which holds for
//! every WMS/WFS release the server speaks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shortest text that can possibly hold `x.y.z`.
const MIN_VERSION_LEN: usize = 5;

/// A three-part protocol version.
///
/// `ProtocolVersion::UNSPECIFIED` (0.0.0) means "negotiate a default" and
/// never collides with a real protocol release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ProtocolVersion {
    /// The "no version negotiated" sentinel.
    pub const UNSPECIFIED: ProtocolVersion = ProtocolVersion::new(0, 0, 0);

    /// WFS 1.0.0
    pub const WFS_1_0_0: ProtocolVersion = ProtocolVersion::new(1, 0, 0);
    /// WFS 1.1.0, the default for XML-encoded WFS requests.
    pub const WFS_1_1_0: ProtocolVersion = ProtocolVersion::new(1, 1, 0);
    /// WMS 1.3.0, the default for XML-encoded WMS requests.
    pub const WMS_1_3_0: ProtocolVersion = ProtocolVersion::new(1, 3, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a VERSION parameter value: exactly three dot-separated runs of
    /// decimal digits.
    pub fn parse(s: &str) -> Result<Self, VersionParseError> {
        let invalid = || VersionParseError::InvalidVersionFormat(s.to_string());

        if s.len() < MIN_VERSION_LEN {
            return Err(invalid());
        }

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }

    /// Single-number encoding used for version-family branching
    /// (100 is the 1.0.0 family, 110 the 1.1.0 family).
    pub fn ordinal(&self) -> u64 {
        u64::from(self.major) * 100 + u64::from(self.minor) * 10 + u64::from(self.patch)
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Self::UNSPECIFIED
    }
}

impl FromStr for ProtocolVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("Invalid version format (use x.y.z): {0:?}")]
    InvalidVersionFormat(String),
}
