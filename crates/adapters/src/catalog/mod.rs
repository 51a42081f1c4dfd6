mod loader;

use std::sync::Arc;

use bag_config_application::{ApplicationError, CatalogSource, ResourceFetcher};
use bag_config_domain::{Catalog, TemplateDescriptor};
use log::debug;

pub use loader::BackgroundCatalogLoader;

pub const DEFAULT_CATALOG_PATH: &str = "/models/templates.json";

/// JSON array of `{ "name", "url" }` objects, in display order.
pub fn parse_catalog(bytes: &[u8]) -> Result<Catalog, ApplicationError> {
    let templates: Vec<TemplateDescriptor> = serde_json::from_slice(bytes)
        .map_err(|error| ApplicationError::Decode(format!("template catalog: {error}")))?;
    Ok(Catalog::new(templates))
}

pub struct JsonCatalogSource {
    fetcher: Arc<dyn ResourceFetcher>,
    path: String,
}

impl JsonCatalogSource {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, path: impl Into<String>) -> Self {
        Self {
            fetcher,
            path: path.into(),
        }
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load_catalog(&self) -> Result<Catalog, ApplicationError> {
        debug!("fetching catalog {} from {}", self.path, self.fetcher.describe());
        let bytes = self.fetcher.fetch(&self.path)?;
        parse_catalog(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetcher(&'static str);

    impl ResourceFetcher for StaticFetcher {
        fn fetch(&self, locator: &str) -> Result<Vec<u8>, ApplicationError> {
            if locator != DEFAULT_CATALOG_PATH {
                return Err(ApplicationError::NotFound(locator.to_string()));
            }
            Ok(self.0.as_bytes().to_vec())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    #[test]
    fn parses_templates_in_order() {
        let catalog = parse_catalog(
            br#"[{"name":"Tote","url":"/m/a.glb"},{"name":"Duffel","url":"/m/b.glb"}]"#,
        )
        .expect("catalog");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).map(|t| t.name.as_str()), Some("Tote"));
        assert_eq!(catalog.get(1).map(|t| t.url.as_str()), Some("/m/b.glb"));
    }

    #[test]
    fn empty_array_is_an_empty_catalog() {
        assert!(parse_catalog(b"[]").expect("catalog").is_empty());
    }

    #[test]
    fn malformed_payloads_are_decode_errors() {
        let payloads: [&[u8]; 4] = [
            br#"{"name":"Tote"}"#,
            br#"[{"name":"Tote"}]"#,
            br#"[{"name":1,"url":"/m/a.glb"}]"#,
            b"<html>not found</html>",
        ];
        for payload in payloads {
            assert!(matches!(
                parse_catalog(payload),
                Err(ApplicationError::Decode(_))
            ));
        }
    }

    #[test]
    fn blank_urls_do_not_discard_the_catalog() {
        let catalog = parse_catalog(
            br#"[{"name":"Tote","url":"/m/a.glb"},{"name":"Duffel","url":"/m/b.glb"},{"name":"Draft","url":""}]"#,
        )
        .expect("catalog");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(2).map(|t| t.url.as_str()), Some(""));
    }

    #[test]
    fn source_fetches_the_configured_path() {
        let source = JsonCatalogSource::new(
            Arc::new(StaticFetcher(r#"[{"name":"Tote","url":"/m/a.glb"}]"#)),
            DEFAULT_CATALOG_PATH,
        );
        assert_eq!(source.load_catalog().expect("catalog").len(), 1);

        let elsewhere = JsonCatalogSource::new(Arc::new(StaticFetcher("[]")), "/other.json");
        assert!(matches!(
            elsewhere.load_catalog(),
            Err(ApplicationError::NotFound(_))
        ));
    }
}
