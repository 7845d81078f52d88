use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to import glTF '{path}'")]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("failed to decode image '{name}'")]
    Image {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("mesh '{mesh}' primitive {primitive} has no positions")]
    MissingPositions { mesh: String, primitive: usize },

    #[error("scene '{0}' contains no drawable geometry")]
    EmptyScene(PathBuf),
}
