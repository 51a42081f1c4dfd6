use std::sync::Arc;

use crate::DomainError;

pub const DEFAULT_ROUGHNESS: f32 = 0.85;
pub const MIN_ROUGHNESS: f32 = 0.6;
pub const MAX_ROUGHNESS: f32 = 1.0;

/// Column-major 4x4 identity.
pub const IDENTITY_TRANSFORM: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl MeshGeometry {
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        indices: Vec<u32>,
    ) -> Result<Self, DomainError> {
        if positions.len() != normals.len() {
            return Err(DomainError::MismatchedNormals {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        if let Some(&index) = indices
            .iter()
            .find(|&&index| index as usize >= positions.len())
        {
            return Err(DomainError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }
        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    pub base_color: [f32; 4],
    pub metalness: f32,
    /// `None` when the asset left roughness unset.
    pub roughness: Option<f32>,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            metalness: 0.0,
            roughness: None,
        }
    }
}

/// Unlit surface; normalization leaves it alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMaterial {
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Basic(BasicMaterial),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshSurface {
    pub geometry: Arc<MeshGeometry>,
    pub material: Option<Material>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshSurface {
    pub fn new(geometry: Arc<MeshGeometry>, material: Option<Material>) -> Self {
        Self {
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(MeshSurface),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: [[f32; 4]; 4],
    pub kind: NodeKind,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: Option<String>, transform: [[f32; 4]; 4], children: Vec<SceneNode>) -> Self {
        Self {
            name,
            transform,
            kind: NodeKind::Group,
            children,
        }
    }

    pub fn mesh(name: Option<String>, surface: MeshSurface) -> Self {
        Self {
            name,
            transform: IDENTITY_TRANSFORM,
            kind: NodeKind::Mesh(surface),
            children: Vec::new(),
        }
    }

    fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a SceneNode)) {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }

    fn visit_mut(&mut self, visitor: &mut impl FnMut(&mut SceneNode)) {
        visitor(self);
        for child in &mut self.children {
            child.visit_mut(visitor);
        }
    }
}

/// Root of a loaded model asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneRoot {
    pub nodes: Vec<SceneNode>,
}

impl SceneRoot {
    pub fn new(nodes: Vec<SceneNode>) -> Self {
        Self { nodes }
    }

    /// Depth-first, parents before children.
    pub fn traverse<'a>(&'a self, mut visitor: impl FnMut(&'a SceneNode)) {
        for node in &self.nodes {
            node.visit(&mut visitor);
        }
    }

    pub fn traverse_mut(&mut self, mut visitor: impl FnMut(&mut SceneNode)) {
        for node in &mut self.nodes {
            node.visit_mut(&mut visitor);
        }
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(|node| {
            if matches!(node.kind, NodeKind::Mesh(_)) {
                count += 1;
            }
        });
        count
    }

    pub fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.traverse(|node| {
            if let NodeKind::Mesh(surface) = &node.kind {
                count += surface.geometry.triangle_count();
            }
        });
        count
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub meshes: usize,
    pub standard_materials: usize,
}

/// Appearance pass applied on every asset swap.
///
/// Every mesh casts and receives shadows. Standard materials lose their
/// metalness and get roughness clamped into `[0.6, 1.0]`, defaulting to 0.85.
/// Running it again on its own output changes nothing.
pub fn normalize_materials(mut root: SceneRoot) -> (SceneRoot, NormalizationReport) {
    let report = normalize_materials_in_place(&mut root);
    (root, report)
}

pub fn normalize_materials_in_place(root: &mut SceneRoot) -> NormalizationReport {
    let mut report = NormalizationReport::default();
    root.traverse_mut(|node| {
        let NodeKind::Mesh(surface) = &mut node.kind else {
            return;
        };
        report.meshes += 1;
        surface.cast_shadow = true;
        surface.receive_shadow = true;

        if let Some(Material::Standard(material)) = &mut surface.material {
            report.standard_materials += 1;
            material.metalness = 0.0;
            let roughness = material.roughness.unwrap_or(DEFAULT_ROUGHNESS);
            material.roughness = Some(roughness.clamp(MIN_ROUGHNESS, MAX_ROUGHNESS));
        }
    });
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Arc<MeshGeometry> {
        Arc::new(
            MeshGeometry::new(
                vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                vec![[0.0, 0.0, 1.0]; 3],
                vec![0, 1, 2],
            )
            .expect("geometry"),
        )
    }

    fn standard(metalness: f32, roughness: Option<f32>) -> Option<Material> {
        Some(Material::Standard(StandardMaterial {
            base_color: [0.5, 0.4, 0.3, 1.0],
            metalness,
            roughness,
        }))
    }

    fn sample_scene() -> SceneRoot {
        SceneRoot::new(vec![SceneNode::group(
            Some("bag".to_string()),
            IDENTITY_TRANSFORM,
            vec![
                SceneNode::mesh(None, MeshSurface::new(triangle(), standard(1.0, Some(0.1)))),
                SceneNode::mesh(None, MeshSurface::new(triangle(), standard(0.3, None))),
                SceneNode::group(
                    None,
                    IDENTITY_TRANSFORM,
                    vec![
                        SceneNode::mesh(
                            None,
                            MeshSurface::new(triangle(), standard(0.0, Some(1.7))),
                        ),
                        SceneNode::mesh(
                            None,
                            MeshSurface::new(
                                triangle(),
                                Some(Material::Basic(BasicMaterial {
                                    color: [1.0, 0.0, 0.0, 1.0],
                                })),
                            ),
                        ),
                        SceneNode::mesh(None, MeshSurface::new(triangle(), None)),
                    ],
                ),
            ],
        )])
    }

    fn standard_params(root: &SceneRoot) -> Vec<(f32, Option<f32>)> {
        let mut out = Vec::new();
        root.traverse(|node| {
            if let NodeKind::Mesh(MeshSurface {
                material: Some(Material::Standard(material)),
                ..
            }) = &node.kind
            {
                out.push((material.metalness, material.roughness));
            }
        });
        out
    }

    #[test]
    fn geometry_rejects_bad_indices_and_normals() {
        assert!(matches!(
            MeshGeometry::new(vec![[0.0; 3]; 3], vec![[0.0; 3]; 2], vec![0, 1, 2]),
            Err(DomainError::MismatchedNormals {
                positions: 3,
                normals: 2
            })
        ));
        assert!(matches!(
            MeshGeometry::new(vec![[0.0; 3]; 3], vec![[0.0; 3]; 3], vec![0, 1, 3]),
            Err(DomainError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        ));
    }

    #[test]
    fn normalization_tunes_standard_materials() {
        let (root, report) = normalize_materials(sample_scene());
        assert_eq!(report.meshes, 5);
        assert_eq!(report.standard_materials, 3);
        assert_eq!(
            standard_params(&root),
            vec![(0.0, Some(0.6)), (0.0, Some(0.85)), (0.0, Some(1.0))]
        );
    }

    #[test]
    fn normalization_enables_shadows_on_every_mesh() {
        let (root, _) = normalize_materials(sample_scene());
        root.traverse(|node| {
            if let NodeKind::Mesh(surface) = &node.kind {
                assert!(surface.cast_shadow);
                assert!(surface.receive_shadow);
            }
        });
    }

    #[test]
    fn normalization_leaves_basic_materials_alone() {
        let (root, _) = normalize_materials(sample_scene());
        let mut basics = Vec::new();
        root.traverse(|node| {
            if let NodeKind::Mesh(MeshSurface {
                material: Some(Material::Basic(material)),
                ..
            }) = &node.kind
            {
                basics.push(material.color);
            }
        });
        assert_eq!(basics, vec![[1.0, 0.0, 0.0, 1.0]]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let (once, _) = normalize_materials(sample_scene());
        let (twice, _) = normalize_materials(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn counts_meshes_and_triangles() {
        let scene = sample_scene();
        assert_eq!(scene.mesh_count(), 5);
        assert_eq!(scene.triangle_count(), 5);
    }
}
