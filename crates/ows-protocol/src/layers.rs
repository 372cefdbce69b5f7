//! Layer catalog consistency checks.
//!
//! Runs on every request: a catalog defect (missing name, title, ...) fails
//! the request with a configuration error, and a TYPENAME/SRSNAME pair is
//! checked against the SRIDs the targeted layer declares.

use ows_common::srs::{is_known_srs_form, matches_any_srid};
use ows_common::{LayerCatalog, OwsError, OwsResult, ParamAccessor, ServiceKind};

const CONFIG_LOCATOR: &str = "config_file";

/// Check every configured layer against the catalog rules and the request.
///
/// The SRID match is tracked across the whole scan: once any targeted layer
/// accepts SRSNAME the request passes, and "doesn't match srid" is only
/// reported when the scan ends without a match.
pub fn check_layers<C, P>(catalog: &C, service: ServiceKind, params: &P) -> OwsResult<()>
where
    C: LayerCatalog + ?Sized,
    P: ParamAccessor + ?Sized,
{
    // (srsname, typename) when the client asked for a specific SRS
    let srs_request = match (params.get("srsname"), params.get("typename")) {
        (Some(srsname), Some(typename)) => Some((srsname, typename)),
        _ => None,
    };

    let mut srid_checked = false;
    let mut srid_matched = false;

    for layer in catalog.layers() {
        let name = layer
            .name
            .as_deref()
            .ok_or_else(|| OwsError::config(CONFIG_LOCATOR, "No layer name defined"))?;

        if !catalog.is_table_backed(name) {
            continue;
        }

        if layer.title.is_none() {
            return Err(OwsError::config(CONFIG_LOCATOR, "No layer title defined"));
        }

        if service == ServiceKind::Wfs {
            if layer.prefix.is_none() {
                return Err(OwsError::config(CONFIG_LOCATOR, "No layer prefix defined"));
            }
            if layer.server.is_none() {
                return Err(OwsError::config(CONFIG_LOCATOR, "No layer server defined"));
            }
        }

        if layer.srid.is_empty() {
            continue;
        }

        let Some((srsname, typename)) = srs_request else {
            continue;
        };

        if typename != name {
            continue;
        }

        if !is_known_srs_form(srsname) {
            return Err(OwsError::config("srsName", "srsname isn't valid"));
        }

        srid_checked = true;
        if matches_any_srid(srsname, &layer.srid) {
            srid_matched = true;
        }
    }

    if srid_checked && !srid_matched {
        return Err(OwsError::config(CONFIG_LOCATOR, "srsname doesn't match srid"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ows_common::{LayerConfig, RequestParams, StaticCatalog};

    fn complete_layer(name: &str, srid: &[&str]) -> LayerConfig {
        LayerConfig {
            name: Some(name.to_string()),
            title: Some(format!("{} title", name)),
            prefix: Some("tows".to_string()),
            ns_uri: Some("http://www.tinyows.org/".to_string()),
            server: Some("pg".to_string()),
            srid: srid.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_missing_name() {
        let catalog = StaticCatalog::new(vec![LayerConfig::default()]);
        let err = check_layers(&catalog, ServiceKind::Wms, &RequestParams::new()).unwrap_err();
        assert_eq!(err.message(), "No layer name defined");
        assert_eq!(err.locator(), "config_file");
    }

    #[test]
    fn test_missing_title_only_for_tables() {
        let layer = LayerConfig::named("roads");
        let catalog = StaticCatalog::new(vec![layer.clone()]);
        assert!(check_layers(&catalog, ServiceKind::Wfs, &RequestParams::new()).is_ok());

        let catalog = catalog.with_table("roads");
        let params = RequestParams::from_pairs([("typename", "roads"), ("srsname", "EPSG:4326")]);
        let err = check_layers(&catalog, ServiceKind::Wms, &params).unwrap_err();
        assert_eq!(err.message(), "No layer title defined");
    }

    #[test]
    fn test_wfs_requires_prefix_and_server() {
        let mut layer = complete_layer("roads", &[]);
        layer.prefix = None;
        let catalog = StaticCatalog::new(vec![layer.clone()]).with_table("roads");

        assert!(check_layers(&catalog, ServiceKind::Wms, &RequestParams::new()).is_ok());
        let err = check_layers(&catalog, ServiceKind::Wfs, &RequestParams::new()).unwrap_err();
        assert_eq!(err.message(), "No layer prefix defined");

        layer.prefix = Some("tows".to_string());
        layer.server = None;
        let catalog = StaticCatalog::new(vec![layer]).with_table("roads");
        let err = check_layers(&catalog, ServiceKind::Wfs, &RequestParams::new()).unwrap_err();
        assert_eq!(err.message(), "No layer server defined");
    }

    #[test]
    fn test_srsname_accepted() {
        let catalog =
            StaticCatalog::new(vec![complete_layer("roads", &["^EPSG:4326$"])]).with_table("roads");
        let params = RequestParams::from_pairs([("typename", "roads"), ("srsname", "EPSG:4326")]);
        assert!(check_layers(&catalog, ServiceKind::Wfs, &params).is_ok());
    }

    #[test]
    fn test_srsname_bad_form_checked_first() {
        let catalog =
            StaticCatalog::new(vec![complete_layer("roads", &["^EPSG:4326$"])]).with_table("roads");
        let params =
            RequestParams::from_pairs([("typename", "roads"), ("srsname", "NotAPrefix:1")]);
        let err = check_layers(&catalog, ServiceKind::Wfs, &params).unwrap_err();
        assert_eq!(err.message(), "srsname isn't valid");
        assert_eq!(err.locator(), "srsName");
    }

    #[test]
    fn test_srsname_not_declared() {
        let catalog =
            StaticCatalog::new(vec![complete_layer("roads", &["^EPSG:4326$"])]).with_table("roads");
        let params = RequestParams::from_pairs([("typename", "roads"), ("srsname", "EPSG:3857")]);
        let err = check_layers(&catalog, ServiceKind::Wfs, &params).unwrap_err();
        assert_eq!(err.message(), "srsname doesn't match srid");
    }

    #[test]
    fn test_srsname_ignored_for_other_layers() {
        let catalog =
            StaticCatalog::new(vec![complete_layer("roads", &["^EPSG:4326$"])]).with_table("roads");
        let params = RequestParams::from_pairs([("typename", "rivers"), ("srsname", "Bogus")]);
        assert!(check_layers(&catalog, ServiceKind::Wfs, &params).is_ok());

        let params = RequestParams::from_pairs([("srsname", "Bogus")]);
        assert!(check_layers(&catalog, ServiceKind::Wfs, &params).is_ok());
    }

    #[test]
    fn test_srid_match_is_shared_across_layers() {
        // Two layers share a name; the first one's match satisfies the scan.
        let catalog = StaticCatalog::new(vec![
            complete_layer("roads", &["^EPSG:4326$"]),
            complete_layer("roads", &["^EPSG:2154$"]),
        ])
        .with_table("roads");
        let params = RequestParams::from_pairs([("typename", "roads"), ("srsname", "EPSG:4326")]);
        assert!(check_layers(&catalog, ServiceKind::Wfs, &params).is_ok());
    }
}
