//! Frame rendering. Both backends draw the same pre-lit, world-space triangle
//! soup built here, so they only differ in how triangles reach pixels.

mod cpu;
mod gpu;

use bag_config_application::{ApplicationError, FrameRenderer};
use bag_config_domain::{
    FrameRequest, GroundPlane, Material, MeshSurface, NodeKind, SceneNode, Stage,
    StandardMaterial,
};
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use log::{info, warn};

pub use self::cpu::CpuFrameRenderer;
pub use self::gpu::WgpuFrameRenderer;

const MAX_RENDER_PIXELS: usize = 2_000_000;
/// Lifts shadow quads off the ground so they win the depth test.
const SHADOW_LIFT: f32 = 0.002;

/// Picks the GPU renderer when an adapter is available.
pub fn default_renderer() -> Box<dyn FrameRenderer> {
    match WgpuFrameRenderer::new() {
        Ok(renderer) => {
            info!("using wgpu frame renderer");
            Box::new(renderer)
        }
        Err(error) => {
            warn!("wgpu unavailable ({error}), falling back to cpu renderer");
            Box::new(CpuFrameRenderer)
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct ShadedVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

pub(crate) struct FrameGeometry {
    pub width: usize,
    pub height: usize,
    pub background: [f32; 3],
    pub view_proj: Mat4,
    /// Triangle list.
    pub vertices: Vec<ShadedVertex>,
}

pub(crate) fn build_frame(request: &FrameRequest<'_>) -> Result<FrameGeometry, ApplicationError> {
    if request.width == 0 || request.height == 0 {
        return Err(ApplicationError::InvalidInput(
            "frame dimensions must be non-zero".to_string(),
        ));
    }
    let (width, height) = render_target(request.width as usize, request.height as usize)?;
    let stage = request.stage;

    let eye = Vec3::from(request.camera.eye());
    let target = Vec3::from(request.camera.target());
    let view = Mat4::look_at_rh(eye, target, Vec3::Y);
    let projection = Mat4::perspective_rh(
        stage.fov_y_degrees.to_radians(),
        width as f32 / height as f32,
        stage.near,
        stage.far,
    );

    let lighting = Lighting::new(stage, eye);
    let mut vertices = Vec::new();

    if let Some(ground) = &stage.ground {
        push_ground(&mut vertices, ground, &lighting);
    }

    if let Some(scene) = request.scene {
        let model = Mat4::from_translation(Vec3::from(stage.model_offset));
        let mut shadows = Vec::new();
        for node in &scene.nodes {
            flatten_node(node, model, &lighting, &mut vertices, &mut shadows);
        }
        if let (Some(ground), true) = (&stage.ground, stage.directional.cast_shadow) {
            push_shadows(&mut vertices, &shadows, ground, &lighting);
        }
    }

    Ok(FrameGeometry {
        width,
        height,
        background: unpack_color(stage.background),
        view_proj: projection * view,
        vertices,
    })
}

struct Lighting {
    ambient: f32,
    directional: f32,
    to_light: Vec3,
    eye: Vec3,
}

impl Lighting {
    fn new(stage: &Stage, eye: Vec3) -> Self {
        Self {
            ambient: stage.ambient.intensity,
            directional: stage.directional.intensity,
            to_light: Vec3::from(stage.directional.to_light()),
            eye,
        }
    }

    fn shade(&self, position: Vec3, normal: Vec3, material: &Material) -> [f32; 3] {
        let standard = match material {
            Material::Basic(basic) => {
                return clamp_color(Vec3::new(basic.color[0], basic.color[1], basic.color[2]))
            }
            Material::Standard(standard) => standard,
        };

        let base = Vec3::new(standard.base_color[0], standard.base_color[1], standard.base_color[2]);
        let metalness = standard.metalness.clamp(0.0, 1.0);
        let roughness = standard.roughness.unwrap_or(1.0).clamp(0.04, 1.0);

        let normal = normal.normalize_or_zero();
        let n_dot_l = normal.dot(self.to_light).max(0.0);
        let diffuse = base * (1.0 - metalness) * (self.ambient + self.directional * n_dot_l);

        let to_eye = (self.eye - position).normalize_or_zero();
        let half = (self.to_light + to_eye).normalize_or_zero();
        let shininess = 2.0 / (roughness * roughness * roughness * roughness) - 2.0;
        let specular_color = Vec3::splat(0.04).lerp(base, metalness);
        let specular = if n_dot_l > 0.0 {
            specular_color
                * self.directional
                * normal.dot(half).max(0.0).powf(shininess.max(1.0))
                * (1.0 - roughness * 0.5)
        } else {
            Vec3::ZERO
        };
        // Metals still need some ambient response or they turn black.
        let metal_ambient = base * metalness * self.ambient * 0.5;

        clamp_color(diffuse + specular + metal_ambient)
    }
}

fn flatten_node(
    node: &SceneNode,
    parent: Mat4,
    lighting: &Lighting,
    vertices: &mut Vec<ShadedVertex>,
    shadows: &mut Vec<Vec3>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform);
    if let NodeKind::Mesh(surface) = &node.kind {
        flatten_mesh(surface, world, lighting, vertices, shadows);
    }
    for child in &node.children {
        flatten_node(child, world, lighting, vertices, shadows);
    }
}

fn flatten_mesh(
    surface: &MeshSurface,
    world: Mat4,
    lighting: &Lighting,
    vertices: &mut Vec<ShadedVertex>,
    shadows: &mut Vec<Vec3>,
) {
    let material = surface
        .material
        .unwrap_or(Material::Standard(StandardMaterial::default()));
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
    let geometry = &surface.geometry;
    let positions = geometry.positions();
    let normals = geometry.normals();

    for triangle in geometry.indices().chunks_exact(3) {
        for &index in triangle {
            let index = index as usize;
            let position = world.transform_point3(Vec3::from(positions[index]));
            let normal = normal_matrix * Vec3::from(normals[index]);
            vertices.push(ShadedVertex {
                position: position.to_array(),
                color: lighting.shade(position, normal, &material),
            });
            if surface.cast_shadow {
                shadows.push(position);
            }
        }
    }
}

fn push_ground(vertices: &mut Vec<ShadedVertex>, ground: &GroundPlane, lighting: &Lighting) {
    let base = Vec3::new(ground.color[0], ground.color[1], ground.color[2]);
    let n_dot_l = Vec3::Y.dot(lighting.to_light).max(0.0);
    let color = clamp_color(base * (lighting.ambient + lighting.directional * n_dot_l));
    push_quad(vertices, ground.height, ground.half_extent, color);
}

/// Projects shadow-casting triangles along the light direction onto the ground.
fn push_shadows(
    vertices: &mut Vec<ShadedVertex>,
    casters: &[Vec3],
    ground: &GroundPlane,
    lighting: &Lighting,
) {
    let to_light = lighting.to_light;
    if to_light.y <= f32::EPSILON {
        return;
    }
    let base = Vec3::new(ground.color[0], ground.color[1], ground.color[2]);
    let color = clamp_color(base * lighting.ambient);
    let plane = ground.height + SHADOW_LIFT;

    for triangle in casters.chunks_exact(3) {
        let projected: Vec<Vec3> = triangle
            .iter()
            .map(|point| {
                let height = (point.y - plane).max(0.0);
                let mut shadow = *point - to_light * (height / to_light.y);
                shadow.y = plane;
                shadow
            })
            .collect();
        let inside = projected.iter().all(|point| {
            point.x.abs() <= ground.half_extent && point.z.abs() <= ground.half_extent
        });
        if !inside {
            continue;
        }
        vertices.extend(projected.into_iter().map(|point| ShadedVertex {
            position: point.to_array(),
            color,
        }));
    }
}

fn push_quad(vertices: &mut Vec<ShadedVertex>, height: f32, half_extent: f32, color: [f32; 3]) {
    let corners = [
        [-half_extent, height, -half_extent],
        [half_extent, height, -half_extent],
        [half_extent, height, half_extent],
        [-half_extent, height, half_extent],
    ];
    for index in [0, 2, 1, 0, 3, 2] {
        vertices.push(ShadedVertex {
            position: corners[index],
            color,
        });
    }
}

fn clamp_color(color: Vec3) -> [f32; 3] {
    color.clamp(Vec3::ZERO, Vec3::ONE).to_array()
}

pub(crate) fn unpack_color(pixel: u32) -> [f32; 3] {
    [
        ((pixel >> 16) & 0xFF) as f32 / 255.0,
        ((pixel >> 8) & 0xFF) as f32 / 255.0,
        (pixel & 0xFF) as f32 / 255.0,
    ]
}

pub(crate) fn pack_color(color: [f32; 3]) -> u32 {
    let [red, green, blue] = color.map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u32);
    (red << 16) | (green << 8) | blue
}

fn render_target(width: usize, height: usize) -> Result<(usize, usize), ApplicationError> {
    let requested_pixels = width
        .checked_mul(height)
        .ok_or_else(|| ApplicationError::InvalidInput("frame dimensions overflow".to_string()))?;
    if requested_pixels <= MAX_RENDER_PIXELS {
        return Ok((width, height));
    }

    let scale = (MAX_RENDER_PIXELS as f64 / requested_pixels as f64).sqrt();
    let render_width = ((width as f64 * scale).floor() as usize).max(1);
    let render_height = ((height as f64 * scale).floor() as usize).max(1);
    Ok((render_width, render_height))
}
