//! Case-insensitive access to request parameters.
//!
//! Parameters come either from a URL query string or from metadata decoded
//! out of an XML request body. Admission only needs presence and value
//! lookups, so it is written against [`ParamAccessor`].

use std::collections::HashMap;

/// Read-only, case-insensitive view over request parameters.
pub trait ParamAccessor {
    /// Whether the key was supplied at all (possibly with an empty value).
    fn has(&self, key: &str) -> bool;

    /// Value for the key, `None` when absent. A key supplied without a value
    /// yields `Some("")`.
    fn get(&self, key: &str) -> Option<&str>;

    /// Value for the key, or empty text when absent.
    fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }
}

/// Request parameters keyed by lowercased name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    values: HashMap<String, String>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs. The first occurrence of a key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params
                .values
                .entry(key.as_ref().to_ascii_lowercase())
                .or_insert_with(|| value.into());
        }
        params
    }

    /// Decode a URL query string (`SERVICE=WFS&REQUEST=GetFeature&...`).
    pub fn from_query(query: &str) -> Result<Self, ParamsError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| ParamsError::InvalidQuery(e.to_string()))?;
        Ok(Self::from_pairs(pairs))
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_ascii_lowercase(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParamAccessor for RequestParams {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_ascii_lowercase())
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let params = RequestParams::from_pairs([("SERVICE", "WFS"), ("TypeName", "roads")]);
        assert!(params.has("service"));
        assert_eq!(params.get("Service"), Some("WFS"));
        assert_eq!(params.get("typename"), Some("roads"));
        assert_eq!(params.get("version"), None);
        assert_eq!(params.get_or_empty("version"), "");
    }

    #[test]
    fn test_from_query_decodes_values() {
        let params =
            RequestParams::from_query("?SERVICE=WFS&srsName=urn%3Aogc%3Adef%3Acrs%3AEPSG%3A%3A4326&VERSION=")
                .unwrap();
        assert_eq!(params.get("service"), Some("WFS"));
        assert_eq!(params.get("srsname"), Some("urn:ogc:def:crs:EPSG::4326"));
        assert!(params.has("version"));
        assert_eq!(params.get("version"), Some(""));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let params = RequestParams::from_pairs([("service", "WMS"), ("SERVICE", "WFS")]);
        assert_eq!(params.get("service"), Some("WMS"));
        assert_eq!(params.len(), 1);
    }
}
