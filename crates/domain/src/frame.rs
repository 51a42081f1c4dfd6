use crate::{OrbitCamera, SceneRoot, Stage};

#[derive(Debug, Clone, Copy)]
pub struct FrameRequest<'a> {
    /// `None` renders the empty stage.
    pub scene: Option<&'a SceneRoot>,
    pub stage: &'a Stage,
    pub camera: &'a OrbitCamera,
    pub width: u32,
    pub height: u32,
}

/// Packed `0x00RRGGBB` pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
    pub render_time_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMetrics {
    pub submitted_requests: u64,
    pub completed_requests: u64,
    pub canceled_requests: u64,
    pub failed_requests: u64,
    pub last_load_time_ms: Option<u64>,
    pub p95_load_time_ms: Option<u64>,
}
