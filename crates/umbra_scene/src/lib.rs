//! Scene graph consumed by the renderer: world-space draw items and the
//! bounding box normalization used to frame the scene.

pub mod bounds;
pub mod graph;

pub use bounds::Aabb;
pub use graph::{SceneDraw, SceneGraph};
