use umbra_core::Transform;

use crate::{
    material::{MaterialData, TextureData},
    mesh::MeshData,
};

#[derive(Clone, Debug, Default)]
pub struct SceneData {
    pub meshes: Vec<MeshData>,
    pub materials: Vec<MaterialData>,
    pub textures: Vec<TextureData>,

    // The node hierarchy, flattened; `roots` index into `nodes`
    pub nodes: Vec<SceneNode>,
    pub roots: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub mesh_index: Option<usize>, // Index into the meshes list above
    pub children: Vec<usize>,
}

impl SceneData {
    pub fn primitive_count(&self) -> usize {
        self.meshes.iter().map(|m| m.primitives.len()).sum()
    }
}
