//! Spatial reference system name checks.
//!
//! WFS clients name the SRS of a request in one of three families:
//! `http://www.opengis.net/...` URLs, `EPSG:xxxx` codes, or `urn:` URNs.
//! Each layer then declares SRID patterns the name has to match.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use tracing::debug;

static SRS_NAME_FORMS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(["^http://www.opengis.net", "^EPSG", "^urn:"])
        .unwrap_or_else(|_| RegexSet::empty())
});

/// Whether `srsname` uses one of the accepted syntactic forms.
pub fn is_known_srs_form(srsname: &str) -> bool {
    SRS_NAME_FORMS.is_match(srsname)
}

/// Match `srsname` against a layer's declared SRID entry.
///
/// The entry is a regular expression; an entry that fails to compile
/// never matches.
pub fn matches_srid(srsname: &str, srid_pattern: &str) -> bool {
    match Regex::new(srid_pattern) {
        Ok(re) => re.is_match(srsname),
        Err(e) => {
            debug!(pattern = srid_pattern, error = %e, "Ignoring unparsable SRID pattern");
            false
        }
    }
}

/// Whether any of the declared SRID entries accepts `srsname`.
pub fn matches_any_srid<S: AsRef<str>>(srsname: &str, srids: &[S]) -> bool {
    srids.iter().any(|srid| matches_srid(srsname, srid.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_forms() {
        assert!(is_known_srs_form("EPSG:4326"));
        assert!(is_known_srs_form("urn:ogc:def:crs:EPSG::4326"));
        assert!(is_known_srs_form("http://www.opengis.net/gml/srs/epsg.xml#4326"));
        assert!(!is_known_srs_form("NotAPrefix:1"));
        assert!(!is_known_srs_form("epsg:4326"));
        assert!(!is_known_srs_form(""));
    }

    #[test]
    fn test_srid_is_a_pattern() {
        assert!(matches_srid("EPSG:4326", "^EPSG:4326$"));
        assert!(!matches_srid("EPSG:43260", "^EPSG:4326$"));
        // Unanchored entries match anywhere in the name
        assert!(matches_srid("urn:ogc:def:crs:EPSG::4326", "4326"));
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        assert!(!matches_srid("EPSG:4326", "EPSG:(4326"));
        assert!(matches_any_srid("EPSG:4326", &["EPSG:(4326", "4326"]));
        assert!(!matches_any_srid::<&str>("EPSG:4326", &[]));
    }
}
