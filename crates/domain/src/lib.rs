mod camera;
mod controls;
mod error;
mod frame;
mod scene;
mod selection;
mod stage;
mod template;
mod viewer;

pub use camera::OrbitCamera;
pub use controls::{CatalogStatus, ControlPanel, SliderView, LOADING_HEADLINE, LOADING_LABEL};
pub use error::DomainError;
pub use frame::{AssetMetrics, FrameRequest, RenderedFrame};
pub use scene::{
    normalize_materials, normalize_materials_in_place, BasicMaterial, Material, MeshGeometry,
    MeshSurface, NodeKind, NormalizationReport, SceneNode, SceneRoot, StandardMaterial,
    DEFAULT_ROUGHNESS, IDENTITY_TRANSFORM, MAX_ROUGHNESS, MIN_ROUGHNESS,
};
pub use selection::Selection;
pub use stage::{AmbientLight, DirectionalLight, GroundPlane, Stage};
pub use template::{Catalog, TemplateDescriptor};
pub use viewer::{ViewerState, ViewportStatus};
