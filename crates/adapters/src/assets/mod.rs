mod cache;
mod import;
mod pipeline;

pub use self::cache::{CacheStats, CachedAssetLoader};
pub use self::import::{import_scene, GltfAssetLoader};
pub use self::pipeline::BackgroundAssetPipeline;
