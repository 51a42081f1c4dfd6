use std::time::Instant;

use bag_config_application::{ApplicationError, FrameRenderer};
use bag_config_domain::{FrameRequest, RenderedFrame};
use glam::{Vec3, Vec4};

use super::{build_frame, pack_color, FrameGeometry, ShadedVertex};

/// Z-buffered scanline-free rasterizer used when no GPU adapter is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuFrameRenderer;

impl FrameRenderer for CpuFrameRenderer {
    fn render(&self, request: &FrameRequest<'_>) -> Result<RenderedFrame, ApplicationError> {
        let started = Instant::now();
        let geometry = build_frame(request)?;
        let pixels = rasterize(&geometry);
        Ok(RenderedFrame {
            width: geometry.width as u32,
            height: geometry.height as u32,
            pixels,
            render_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn backend_name(&self) -> &'static str {
        "cpu"
    }
}

#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    clip: Vec4,
    color: Vec3,
}

struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    color: Vec3,
}

fn rasterize(geometry: &FrameGeometry) -> Vec<u32> {
    let FrameGeometry {
        width,
        height,
        background,
        view_proj,
        vertices,
    } = geometry;
    let (width, height) = (*width, *height);
    let mut pixels = vec![pack_color(*background); width * height];
    let mut depth = vec![f32::INFINITY; width * height];

    for triangle in vertices.chunks_exact(3) {
        let clipped = clip_near(
            triangle
                .iter()
                .map(|vertex: &ShadedVertex| ClipVertex {
                    clip: *view_proj * Vec3::from(vertex.position).extend(1.0),
                    color: Vec3::from(vertex.color),
                })
                .collect(),
        );
        if clipped.len() < 3 {
            continue;
        }
        let screen: Vec<ScreenVertex> = clipped
            .iter()
            .map(|vertex| to_screen(vertex, width, height))
            .collect();
        for i in 1..screen.len() - 1 {
            fill_triangle(
                [&screen[0], &screen[i], &screen[i + 1]],
                width,
                height,
                &mut pixels,
                &mut depth,
            );
        }
    }
    pixels
}

/// Sutherland-Hodgman against the near plane (`z >= 0` in wgpu clip space).
fn clip_near(polygon: Vec<ClipVertex>) -> Vec<ClipVertex> {
    if polygon.iter().all(|vertex| vertex.clip.z >= 0.0) {
        return polygon;
    }
    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (index, current) in polygon.iter().enumerate() {
        let next = &polygon[(index + 1) % polygon.len()];
        let current_inside = current.clip.z >= 0.0;
        let next_inside = next.clip.z >= 0.0;
        if current_inside {
            out.push(*current);
        }
        if current_inside != next_inside {
            let t = current.clip.z / (current.clip.z - next.clip.z);
            out.push(ClipVertex {
                clip: current.clip.lerp(next.clip, t),
                color: current.color.lerp(next.color, t),
            });
        }
    }
    out
}

fn to_screen(vertex: &ClipVertex, width: usize, height: usize) -> ScreenVertex {
    let w = vertex.clip.w.max(f32::EPSILON);
    let ndc = vertex.clip.truncate() / w;
    ScreenVertex {
        x: (ndc.x * 0.5 + 0.5) * width as f32,
        y: (0.5 - ndc.y * 0.5) * height as f32,
        depth: ndc.z,
        color: vertex.color,
    }
}

fn fill_triangle(
    [a, b, c]: [&ScreenVertex; 3],
    width: usize,
    height: usize,
    pixels: &mut [u32],
    depth: &mut [f32],
) {
    let area = edge(a, b, c.x, c.y);
    if area.abs() <= f32::EPSILON {
        return;
    }

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as usize;
    let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as usize).min(width);
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as usize;
    let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as usize).min(height);

    for y in min_y..max_y {
        let py = y as f32 + 0.5;
        for x in min_x..max_x {
            let px = x as f32 + 0.5;
            let w0 = edge(b, c, px, py) / area;
            let w1 = edge(c, a, px, py) / area;
            let w2 = edge(a, b, px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let z = w0 * a.depth + w1 * b.depth + w2 * c.depth;
            if !(0.0..=1.0).contains(&z) {
                continue;
            }
            let offset = y * width + x;
            if z >= depth[offset] {
                continue;
            }
            depth[offset] = z;
            let color = a.color * w0 + b.color * w1 + c.color * w2;
            pixels[offset] = pack_color(color.to_array());
        }
    }
}

fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

#[cfg(test)]
mod tests {
    use bag_config_domain::{Material, OrbitCamera, Stage, StandardMaterial};

    use super::*;
    use crate::render::tests::panel_scene;

    fn render(scene: Option<&bag_config_domain::SceneRoot>, stage: &Stage) -> RenderedFrame {
        let camera = OrbitCamera::default();
        CpuFrameRenderer
            .render(&FrameRequest {
                scene,
                stage,
                camera: &camera,
                width: 80,
                height: 60,
            })
            .expect("render")
    }

    #[test]
    fn bare_stage_without_ground_is_background() {
        let stage = Stage {
            ground: None,
            ..Stage::default()
        };
        let frame = render(None, &stage);
        assert_eq!((frame.width, frame.height), (80, 60));
        assert!(frame.pixels.iter().all(|&pixel| pixel == 0xF5F5F5));
    }

    #[test]
    fn ground_fills_the_lower_half() {
        let frame = render(None, &Stage::default());
        let bottom_center = frame.pixels[59 * 80 + 40];
        let top_center = frame.pixels[40];
        assert_eq!(top_center, 0xF5F5F5);
        assert_ne!(bottom_center, 0xF5F5F5);
    }

    #[test]
    fn model_covers_the_center() {
        let stage = Stage {
            ground: None,
            ..Stage::default()
        };
        let scene = panel_scene(Material::Standard(StandardMaterial {
            base_color: [0.6, 0.1, 0.1, 1.0],
            ..StandardMaterial::default()
        }));
        let frame = render(Some(&scene), &stage);
        let center = frame.pixels[30 * 80 + 40];
        assert_ne!(center, 0xF5F5F5);
        let red = (center >> 16) & 0xFF;
        let blue = center & 0xFF;
        assert!(red > blue);
    }

    #[test]
    fn backend_is_named() {
        assert_eq!(CpuFrameRenderer.backend_name(), "cpu");
    }
}
