mod error;
mod ports;
mod service;
mod use_cases;

pub use error::ApplicationError;
pub use ports::{
    AssetEvent, AssetLoader, AssetPipeline, AssetRequest, CatalogLoader, CatalogSource,
    FrameRenderer, ResourceFetcher,
};
pub use service::ApplicationService;
pub use use_cases::{
    AssetMetricsQuery, ControlsQuery, NextTemplateCommand, OrbitCommand, PollCommand, PollReport,
    PrevTemplateCommand, RenderFrameCommand, SetIndexCommand, StartCommand, ViewportStatusQuery,
    ZoomCommand,
};
