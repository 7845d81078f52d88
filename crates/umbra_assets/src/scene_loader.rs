use std::path::Path;

use crate::{error::AssetError, scene::SceneData};

mod gltf_parser;

pub use gltf_parser::{parse_gltf, parse_gltf_slice};

/// Loads a scene for viewing. A scene without a single triangle primitive is
/// rejected since there is nothing to render or trace against.
pub fn load_scene(path: &Path) -> Result<SceneData, AssetError> {
    log::info!("loading scene {}", path.display());

    let scene = parse_gltf(path)?;
    if scene.primitive_count() == 0 {
        return Err(AssetError::EmptyScene(path.to_path_buf()));
    }

    log::info!(
        "scene loaded: {} nodes, {} meshes, {} primitives, {} materials, {} textures",
        scene.nodes.len(),
        scene.meshes.len(),
        scene.primitive_count(),
        scene.materials.len(),
        scene.textures.len()
    );
    Ok(scene)
}
