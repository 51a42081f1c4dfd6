use std::sync::Arc;

use bag_config_domain::{AssetMetrics, Catalog, FrameRequest, RenderedFrame, SceneRoot};

use crate::ApplicationError;

/// Reads raw bytes for a locator such as `/models/templates.json`.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, ApplicationError>;

    fn describe(&self) -> String;
}

pub trait CatalogSource: Send + Sync {
    fn load_catalog(&self) -> Result<Catalog, ApplicationError>;
}

/// Asynchronous catalog fetch. Poll-based so the UI loop never blocks.
pub trait CatalogLoader {
    fn request_catalog(&self) -> Result<(), ApplicationError>;

    fn try_receive_catalog(&self) -> Result<Option<Result<Catalog, ApplicationError>>, ApplicationError>;
}

/// Resolves an asset URL to a scene graph. May fail; callers decide about caching.
pub trait AssetLoader: Send + Sync {
    fn resolve(&self, url: &str) -> Result<Arc<SceneRoot>, ApplicationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub index: usize,
    pub url: String,
}

#[derive(Debug)]
pub struct AssetEvent {
    pub sequence: u64,
    pub request: AssetRequest,
    pub outcome: Result<Arc<SceneRoot>, ApplicationError>,
    pub load_time_ms: u64,
}

/// Background asset resolution where only the newest request matters.
pub trait AssetPipeline {
    /// Returns the sequence number assigned to the request.
    fn submit_asset(&self, request: AssetRequest) -> Result<u64, ApplicationError>;

    fn try_receive_asset(&self) -> Result<Option<AssetEvent>, ApplicationError>;

    fn metrics(&self) -> Result<AssetMetrics, ApplicationError>;
}

pub trait FrameRenderer {
    fn render(&self, request: &FrameRequest<'_>) -> Result<RenderedFrame, ApplicationError>;

    fn backend_name(&self) -> &'static str;
}
