#[derive(Debug, Clone, Default)]
pub struct StartCommand;

#[derive(Debug, Clone, Default)]
pub struct PollCommand;

#[derive(Debug, Clone, Copy)]
pub struct SetIndexCommand {
    pub index: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NextTemplateCommand;

#[derive(Debug, Clone, Default)]
pub struct PrevTemplateCommand;

#[derive(Debug, Clone, Default)]
pub struct ControlsQuery;

#[derive(Debug, Clone, Default)]
pub struct ViewportStatusQuery;

#[derive(Debug, Clone, Default)]
pub struct AssetMetricsQuery;

/// Radians.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCommand {
    pub delta_yaw: f32,
    pub delta_pitch: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct ZoomCommand {
    pub factor: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderFrameCommand {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    pub catalog_settled: bool,
    pub asset_swapped: bool,
    pub stale_assets_dropped: usize,
}
