//! Shared test utilities for the OWS admission workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Layer catalog and server metadata fixtures
//! - An on-disk OGC schema directory fixture
//! - A recording schema engine and diagnostic sink
//! - A counting metrics recorder
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, RecordingEngine};
//! ```

pub mod engines;
pub mod fixtures;
pub mod recorder;

pub use ows_common;

pub use engines::{RecordingEngine, RecordingSink};
pub use recorder::CountingRecorder;
pub use fixtures::*;

/// Assert that an admission result is a refusal of the given kind.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_refused;
///
/// assert_refused!(result, MissingParameter, "SERVICE");
/// assert_refused!(result, Config, "config_file", "No layer title defined");
/// ```
#[macro_export]
macro_rules! assert_refused {
    ($result:expr, $kind:ident, $locator:expr) => {{
        match &$result {
            Err(err @ $crate::ows_common::OwsError::$kind { .. }) => {
                assert_eq!(err.locator(), $locator, "unexpected locator for {:?}", err);
            }
            other => panic!(
                "expected {} refusal, got {:?}",
                stringify!($kind),
                other
            ),
        }
    }};
    ($result:expr, $kind:ident, $locator:expr, $message:expr) => {{
        match &$result {
            Err(err @ $crate::ows_common::OwsError::$kind { .. }) => {
                assert_eq!(err.locator(), $locator, "unexpected locator for {:?}", err);
                assert_eq!(err.message(), $message, "unexpected message for {:?}", err);
            }
            other => panic!(
                "expected {} refusal, got {:?}",
                stringify!($kind),
                other
            ),
        }
    }};
}

#[cfg(test)]
mod tests {
    use ows_common::{OwsError, OwsResult};

    #[test]
    fn test_assert_refused_passes() {
        let result: OwsResult<()> = Err(OwsError::missing_parameter("SERVICE", "SERVICE is not set"));
        assert_refused!(result, MissingParameter, "SERVICE");
        assert_refused!(result, MissingParameter, "SERVICE", "SERVICE is not set");
    }

    #[test]
    #[should_panic(expected = "expected Config refusal")]
    fn test_assert_refused_fails_on_other_kind() {
        let result: OwsResult<()> = Err(OwsError::invalid_parameter("service", "service unknown"));
        assert_refused!(result, Config, "service");
    }
}
