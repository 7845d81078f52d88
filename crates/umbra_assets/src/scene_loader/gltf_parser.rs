use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use glam::Quat;
use umbra_core::Transform;

use crate::{
    error::AssetError,
    material::{MaterialData, MaterialSettings, TextureData, TextureFormat},
    mesh::{MeshData, PrimitiveData, Vertex, compute_vertex_normals},
    scene::{SceneData, SceneNode},
};

/// Loads a `.gltf` / `.glb` file from disk.
pub fn parse_gltf(path: &Path) -> Result<SceneData, AssetError> {
    let to_error = |source| AssetError::Gltf {
        path: path.to_path_buf(),
        source,
    };

    let gltf::Gltf { document, blob } = gltf::Gltf::open(path).map_err(to_error)?;
    let base_path = path.parent().unwrap_or(Path::new("./"));
    let buffers = gltf::import_buffers(&document, Some(base_path), blob).map_err(to_error)?;

    build_scene(&document, &buffers, Some(base_path))
}

/// Loads a glTF document held in memory. External resources can only be
/// resolved through data URIs or the binary chunk.
pub fn parse_gltf_slice(bytes: &[u8]) -> Result<SceneData, AssetError> {
    let to_error = |source| AssetError::Gltf {
        path: PathBuf::from("<memory>"),
        source,
    };

    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes).map_err(to_error)?;
    let buffers = gltf::import_buffers(&document, None, blob).map_err(to_error)?;

    build_scene(&document, &buffers, None)
}

fn build_scene(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    base_path: Option<&Path>,
) -> Result<SceneData, AssetError> {
    // --- STEP 1: TEXTURES ---
    // Only images referenced as base colour are decoded.
    let mut textures = Vec::new();
    let mut texture_map: HashMap<usize, usize> = HashMap::new(); // glTF image index -> ours

    for material in document.materials() {
        let Some(info) = material.pbr_metallic_roughness().base_color_texture() else {
            continue;
        };
        let image = info.texture().source();
        if texture_map.contains_key(&image.index()) {
            continue;
        }

        match decode_image(&image, buffers, base_path)? {
            Some(texture) => {
                texture_map.insert(image.index(), textures.len());
                textures.push(texture);
            }
            None => log::warn!(
                "image {} ({}) could not be resolved, using the default texture",
                image.index(),
                image.name().unwrap_or("unnamed")
            ),
        }
    }

    // --- STEP 2: MATERIALS ---
    let materials = document
        .materials()
        .map(|mat| {
            let pbr = mat.pbr_metallic_roughness();
            let base_color_texture = pbr
                .base_color_texture()
                .and_then(|info| texture_map.get(&info.texture().source().index()).copied());

            MaterialData {
                name: mat.name().unwrap_or("Material").to_string(),
                settings: MaterialSettings {
                    base_color: pbr.base_color_factor(),
                    roughness: pbr.roughness_factor(),
                    metallic: pbr.metallic_factor(),
                },
                base_color_texture,
            }
        })
        .collect();

    // --- STEP 3: MESHES ---
    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let name = mesh.name().unwrap_or("Mesh").to_string();
        let mut primitives = Vec::new();

        for (primitive_index, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "skipping primitive {primitive_index} of '{name}': mode {:?} is not a triangle list",
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .ok_or_else(|| AssetError::MissingPositions {
                    mesh: name.clone(),
                    primitive: primitive_index,
                })?;

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|read| read.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_else(|| compute_vertex_normals(&positions, &indices));

            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|read| read.into_f32().collect())
                .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

            // Interleave vertices (Position + Normal + UV)
            let vertices = positions
                .iter()
                .enumerate()
                .map(|(i, position)| Vertex {
                    position: *position,
                    normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                    uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
                })
                .collect();

            primitives.push(PrimitiveData {
                vertices,
                indices,
                material_index: primitive.material().index(),
            });
        }

        meshes.push(MeshData { name, primitives });
    }

    // --- STEP 4: NODES (The Hierarchy) ---
    let nodes: Vec<SceneNode> = document
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();
            SceneNode {
                name: node.name().unwrap_or("Node").to_string(),
                transform: Transform {
                    translation: t.into(),
                    rotation: Quat::from_array(r),
                    scale: s.into(),
                },
                mesh_index: node.mesh().map(|m| m.index()),
                children: node.children().map(|c| c.index()).collect(),
            }
        })
        .collect();

    let roots = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene.nodes().map(|n| n.index()).collect(),
        None => {
            // No scene declared: every node nobody claims as a child is a root.
            let mut is_child = vec![false; nodes.len()];
            for node in &nodes {
                for &child in &node.children {
                    is_child[child] = true;
                }
            }
            (0..nodes.len()).filter(|&i| !is_child[i]).collect()
        }
    };

    Ok(SceneData {
        meshes,
        materials,
        textures,
        nodes,
        roots,
    })
}

fn decode_image(
    image: &gltf::Image,
    buffers: &[gltf::buffer::Data],
    base_path: Option<&Path>,
) -> Result<Option<TextureData>, AssetError> {
    let name = image.name().unwrap_or("glTF Image").to_string();
    let to_error = |source| AssetError::Image {
        name: name.clone(),
        source,
    };

    let decoded = match image.source() {
        gltf::image::Source::View { view, .. } => {
            let buffer = &buffers[view.buffer().index()];
            let start = view.offset();
            let end = start + view.length();
            image::load_from_memory(&buffer[start..end]).map_err(to_error)?
        }
        gltf::image::Source::Uri { uri, .. } => {
            let Some(base_path) = base_path.filter(|_| !uri.starts_with("data:")) else {
                return Ok(None);
            };
            image::open(base_path.join(uri)).map_err(to_error)?
        }
    };

    let rgba = decoded.to_rgba8();
    Ok(Some(TextureData {
        name,
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
        format: TextureFormat::Rgba8UnormSrgb,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One triangle, referenced by a child node below a translated parent.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "parent", "translation": [2.0, 0.0, 0.0], "children": [1] },
            { "name": "child", "mesh": 0, "scale": [2.0, 2.0, 2.0] }
        ],
        "meshes": [{
            "name": "triangle",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }]
        }],
        "materials": [{
            "name": "red",
            "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0] }
        }],
        "buffers": [{
            "byteLength": 42,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIA"
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    #[test]
    fn loads_an_embedded_triangle() {
        let scene = parse_gltf_slice(TRIANGLE_GLTF.as_bytes()).expect("valid glTF");

        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.primitive_count(), 1);
        let primitive = &scene.meshes[0].primitives[0];
        assert_eq!(primitive.vertices.len(), 3);
        assert_eq!(primitive.indices, vec![0, 1, 2]);
        assert_eq!(primitive.material_index, Some(0));
        assert_eq!(primitive.vertices[1].position, [1.0, 0.0, 0.0]);
        // Normals were generated from the winding
        assert_eq!(primitive.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn keeps_hierarchy_and_materials() {
        let scene = parse_gltf_slice(TRIANGLE_GLTF.as_bytes()).expect("valid glTF");

        assert_eq!(scene.roots, vec![0]);
        assert_eq!(scene.nodes[0].children, vec![1]);
        assert_eq!(scene.nodes[0].mesh_index, None);
        assert_eq!(scene.nodes[1].mesh_index, Some(0));
        assert_eq!(scene.nodes[0].transform.translation.x, 2.0);

        assert_eq!(scene.materials.len(), 1);
        assert_eq!(scene.materials[0].settings.base_color, [1.0, 0.0, 0.0, 1.0]);
        assert!(scene.materials[0].base_color_texture.is_none());
        assert!(scene.textures.is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_gltf_slice(b"not a gltf document"),
            Err(AssetError::Gltf { .. })
        ));
    }
}
