//! glTF/GLB import into the domain scene graph.

use std::collections::HashMap;
use std::sync::Arc;

use bag_config_application::{ApplicationError, AssetLoader, ResourceFetcher};
use bag_config_domain::{
    BasicMaterial, Material, MeshGeometry, MeshSurface, SceneNode, SceneRoot, StandardMaterial,
};
use gltf::mesh::Mode;
use log::debug;

pub struct GltfAssetLoader {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl GltfAssetLoader {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }
}

impl AssetLoader for GltfAssetLoader {
    fn resolve(&self, url: &str) -> Result<Arc<SceneRoot>, ApplicationError> {
        if url.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "template has no model url".to_string(),
            ));
        }
        let bytes = self.fetcher.fetch(url)?;
        let scene = import_scene(&bytes).map_err(|error| match error {
            ApplicationError::Decode(msg) => ApplicationError::Decode(format!("{url}: {msg}")),
            other => other,
        })?;
        debug!(
            "imported {url}: meshes={} triangles={}",
            scene.mesh_count(),
            scene.triangle_count()
        );
        Ok(Arc::new(scene))
    }
}

type GeometryCache = HashMap<(usize, usize), Arc<MeshGeometry>>;

/// Parses `.glb` or self-contained `.gltf` bytes. Only triangle primitives are kept.
pub fn import_scene(bytes: &[u8]) -> Result<SceneRoot, ApplicationError> {
    let (document, buffers, _images) =
        gltf::import_slice(bytes).map_err(|error| ApplicationError::Decode(error.to_string()))?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| ApplicationError::Decode("asset contains no scenes".to_string()))?;

    let mut geometries = GeometryCache::new();
    let nodes = scene
        .nodes()
        .map(|node| convert_node(&node, &buffers, &mut geometries))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SceneRoot::new(nodes))
}

fn convert_node(
    node: &gltf::Node<'_>,
    buffers: &[gltf::buffer::Data],
    geometries: &mut GeometryCache,
) -> Result<SceneNode, ApplicationError> {
    let mut children = Vec::new();

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                debug!(
                    "skipping {:?} primitive in mesh {}",
                    primitive.mode(),
                    mesh.index()
                );
                continue;
            }
            let key = (mesh.index(), primitive.index());
            let geometry = match geometries.get(&key) {
                Some(geometry) => Arc::clone(geometry),
                None => {
                    let Some(geometry) = read_geometry(&primitive, buffers)? else {
                        continue;
                    };
                    let geometry = Arc::new(geometry);
                    geometries.insert(key, Arc::clone(&geometry));
                    geometry
                }
            };
            children.push(SceneNode::mesh(
                mesh.name().map(str::to_string),
                MeshSurface::new(geometry, Some(convert_material(&primitive.material()))),
            ));
        }
    }

    for child in node.children() {
        children.push(convert_node(&child, buffers, geometries)?);
    }

    Ok(SceneNode::group(
        node.name().map(str::to_string),
        node.transform().matrix(),
        children,
    ))
}

fn read_geometry(
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Result<Option<MeshGeometry>, ApplicationError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
    let Some(positions) = reader.read_positions() else {
        return Ok(None);
    };
    let positions: Vec<[f32; 3]> = positions.collect();
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let normals = match reader.read_normals() {
        Some(normals) => normals.collect(),
        None => smooth_normals(&positions, &indices),
    };
    Ok(Some(MeshGeometry::new(positions, normals, indices)?))
}

/// Area-weighted vertex normals for assets that ship without them.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![[0.0_f32; 3]; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        let (Some(pa), Some(pb), Some(pc)) = (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        let ab = [pb[0] - pa[0], pb[1] - pa[1], pb[2] - pa[2]];
        let ac = [pc[0] - pa[0], pc[1] - pa[1], pc[2] - pa[2]];
        let face = [
            ab[1] * ac[2] - ab[2] * ac[1],
            ab[2] * ac[0] - ab[0] * ac[2],
            ab[0] * ac[1] - ab[1] * ac[0],
        ];
        for vertex in [a, b, c] {
            for axis in 0..3 {
                accumulated[vertex][axis] += face[axis];
            }
        }
    }

    accumulated
        .into_iter()
        .map(|[x, y, z]| {
            let length = (x * x + y * y + z * z).sqrt();
            if length <= f32::EPSILON {
                [0.0, 1.0, 0.0]
            } else {
                [x / length, y / length, z / length]
            }
        })
        .collect()
}

fn convert_material(material: &gltf::Material<'_>) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let base_color = pbr.base_color_factor();
    if material.unlit() {
        return Material::Basic(BasicMaterial { color: base_color });
    }
    Material::Standard(StandardMaterial {
        base_color,
        metalness: pbr.metallic_factor(),
        roughness: Some(pbr.roughness_factor()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bag_config_domain::NodeKind;

    /// One triangle under a translated parent node, packed as GLB.
    fn triangle_glb(metallic: f32, roughness: f32, unlit: bool) -> Vec<u8> {
        let mut bin = Vec::new();
        for position in [[0.0_f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for component in position {
                bin.extend_from_slice(&component.to_le_bytes());
            }
        }
        for index in [0_u16, 1, 2] {
            bin.extend_from_slice(&index.to_le_bytes());
        }
        let byte_length = bin.len();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let material_extensions = if unlit {
            r#","extensions":{"KHR_materials_unlit":{}}"#
        } else {
            ""
        };
        let extensions_used = if unlit {
            r#","extensionsUsed":["KHR_materials_unlit"]"#
        } else {
            ""
        };
        let json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"#,
                r#""nodes":[{{"name":"root","translation":[0.0,0.5,0.0],"children":[1]}},{{"name":"body","mesh":0}}],"#,
                r#""meshes":[{{"name":"bag","primitives":[{{"attributes":{{"POSITION":0}},"indices":1,"material":0}}]}}],"#,
                r#""materials":[{{"pbrMetallicRoughness":{{"baseColorFactor":[0.8,0.2,0.1,1.0],"metallicFactor":{metallic},"roughnessFactor":{roughness}}}{material_extensions}}}],"#,
                r#""buffers":[{{"byteLength":{byte_length}}}],"#,
                r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36,"target":34962}},{{"buffer":0,"byteOffset":36,"byteLength":6,"target":34963}}],"#,
                r#""accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0.0,0.0,0.0],"max":[1.0,1.0,0.0]}},{{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}}]"#,
                r#"{extensions_used}}}"#
            ),
            metallic = metallic,
            roughness = roughness,
            material_extensions = material_extensions,
            byte_length = byte_length,
            extensions_used = extensions_used,
        );
        let mut json = json.into_bytes();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2_u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"BIN\0");
        glb.extend_from_slice(&bin);
        glb
    }

    fn only_mesh(scene: &SceneRoot) -> MeshSurface {
        let mut found = None;
        scene.traverse(|node| {
            if let NodeKind::Mesh(surface) = &node.kind {
                found.get_or_insert_with(|| surface.clone());
            }
        });
        found.expect("mesh")
    }

    struct MemoryFetcher(Vec<u8>);

    impl ResourceFetcher for MemoryFetcher {
        fn fetch(&self, _locator: &str) -> Result<Vec<u8>, ApplicationError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    #[test]
    fn imports_hierarchy_and_transforms() {
        let scene = import_scene(&triangle_glb(1.0, 0.2, false)).expect("import");
        assert_eq!(scene.nodes.len(), 1);
        let root = &scene.nodes[0];
        assert_eq!(root.name.as_deref(), Some("root"));
        assert_eq!(root.transform[3][1], 0.5);
        assert_eq!(root.children.len(), 1);
        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.triangle_count(), 1);
    }

    #[test]
    fn imports_pbr_factors() {
        let scene = import_scene(&triangle_glb(1.0, 0.25, false)).expect("import");
        match only_mesh(&scene).material {
            Some(Material::Standard(material)) => {
                assert_eq!(material.metalness, 1.0);
                assert_eq!(material.roughness, Some(0.25));
                assert_eq!(material.base_color, [0.8, 0.2, 0.1, 1.0]);
            }
            other => panic!("expected standard material, got {other:?}"),
        }
    }

    #[test]
    fn unlit_materials_become_basic() {
        let scene = import_scene(&triangle_glb(0.0, 1.0, true)).expect("import");
        assert!(matches!(
            only_mesh(&scene).material,
            Some(Material::Basic(_))
        ));
    }

    #[test]
    fn missing_normals_are_generated() {
        let scene = import_scene(&triangle_glb(0.0, 1.0, false)).expect("import");
        let mesh = only_mesh(&scene);
        for normal in mesh.geometry.normals() {
            assert!((normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn garbage_bytes_are_decode_errors() {
        let loader = GltfAssetLoader::new(Arc::new(MemoryFetcher(b"not a model".to_vec())));
        match loader.resolve("/m/broken.glb") {
            Err(ApplicationError::Decode(msg)) => assert!(msg.starts_with("/m/broken.glb")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn loader_resolves_through_fetcher() {
        let loader = GltfAssetLoader::new(Arc::new(MemoryFetcher(triangle_glb(0.5, 0.5, false))));
        let scene = loader.resolve("/m/a.glb").expect("resolve");
        assert_eq!(scene.mesh_count(), 1);
    }

    #[test]
    fn blank_url_fails_without_fetching() {
        let loader = GltfAssetLoader::new(Arc::new(MemoryFetcher(triangle_glb(0.5, 0.5, false))));
        for url in ["", "   "] {
            assert!(matches!(
                loader.resolve(url),
                Err(ApplicationError::InvalidInput(_))
            ));
        }
    }
}
