use std::time::Duration;

use bag_config_application::{ApplicationError, ResourceFetcher};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use super::is_http_url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking GET against a base URL. Meant to run on worker threads.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: Client,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| ApplicationError::Fetch(error.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, locator: &str) -> String {
        if is_http_url(locator) {
            return locator.to_string();
        }
        format!("{}/{}", self.base_url, locator.trim_start_matches('/'))
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, ApplicationError> {
        let url = self.url_for(locator);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|error| ApplicationError::Fetch(format!("GET {url}: {error}")))?;
        check_status(&url, response.status())?;
        let body = response
            .bytes()
            .map_err(|error| ApplicationError::Fetch(format!("GET {url}: {error}")))?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

fn check_status(url: &str, status: StatusCode) -> Result<(), ApplicationError> {
    if status.is_success() {
        return Ok(());
    }
    Err(ApplicationError::Fetch(format!("GET {url} returned {status}")))
}
