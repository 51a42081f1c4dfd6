mod fs;
mod http;

use std::sync::Arc;

use bag_config_application::{ApplicationError, ResourceFetcher};

pub use fs::FsFetcher;
pub use http::HttpFetcher;

/// HTTP(S) roots go over the network, anything else is a local directory.
pub fn fetcher_for_root(root: &str) -> Result<Arc<dyn ResourceFetcher>, ApplicationError> {
    if root.trim().is_empty() {
        return Err(ApplicationError::InvalidInput(
            "asset root must not be empty".to_string(),
        ));
    }
    if is_http_url(root) {
        return Ok(Arc::new(HttpFetcher::new(root)?));
    }
    Ok(Arc::new(FsFetcher::new(root)))
}

pub(crate) fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_fetcher_by_root_scheme() {
        let http = fetcher_for_root("https://example.com/app").expect("http");
        assert_eq!(http.describe(), "https://example.com/app");
        let fs = fetcher_for_root("public").expect("fs");
        assert_eq!(fs.describe(), "public");
        assert!(matches!(
            fetcher_for_root("  "),
            Err(ApplicationError::InvalidInput(_))
        ));
    }
}
