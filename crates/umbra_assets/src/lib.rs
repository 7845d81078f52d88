//! Scene assets: glTF import into plain CPU-side data (meshes, materials,
//! textures and the node hierarchy).

mod error;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod scene_loader;

pub use error::AssetError;
pub use material::{MaterialData, MaterialSettings, TextureData, TextureFormat};
pub use mesh::{MeshData, PrimitiveData, Vertex};
pub use scene::{SceneData, SceneNode};
pub use scene_loader::load_scene;
