pub mod assets;
pub mod catalog;
pub mod fetch;
pub mod presenters;
pub mod render;

pub use assets::{
    import_scene, BackgroundAssetPipeline, CacheStats, CachedAssetLoader, GltfAssetLoader,
};
pub use catalog::{parse_catalog, BackgroundCatalogLoader, JsonCatalogSource, DEFAULT_CATALOG_PATH};
pub use fetch::{fetcher_for_root, FsFetcher, HttpFetcher};
pub use presenters::{
    present_asset_metrics, present_cache_stats, present_catalog_row, present_scene_summary,
};
pub use render::{default_renderer, CpuFrameRenderer, WgpuFrameRenderer};
