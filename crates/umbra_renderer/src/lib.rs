//! GPU side of the viewer: device and surface, per-frame uniform rings, the
//! binding layout, scene upload, acceleration structures and the shadowed
//! mesh program.

pub mod accel;
pub mod bindings;
mod context;
mod error;
pub mod frame_ring;
pub mod gpu_scene;
pub mod light;
pub mod material;
pub mod mesh;
pub mod programs;
mod render;
pub mod scene_uniform;
pub mod texture;

pub use context::{FrameTarget, RenderContext, pick_surface_format, required_features};
pub use error::RenderError;
pub use frame_ring::{FrameRing, SlotStorage};
pub use light::{
    LightList, LightListError, MAX_POINT_LIGHTS, PointLight, PointLightUniform,
    selection_after_remove,
};
pub use render::{SceneRenderer, clear_color};
pub use scene_uniform::SceneUniform;
