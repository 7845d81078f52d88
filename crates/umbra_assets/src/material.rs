#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
}

#[derive(Clone, Debug)]
pub struct TextureData {
    pub name: String,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl TextureData {
    /// `true` if `pixels` holds exactly `width * height` RGBA8 texels.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() as u64 == u64::from(self.width) * u64::from(self.height) * 4
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSettings {
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metallic: f32,
}

impl Default for MaterialSettings {
    /// White, half rough dielectric. Used for primitives without a material.
    fn default() -> Self {
        Self {
            base_color: [1.0; 4],
            roughness: 0.5,
            metallic: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MaterialData {
    pub name: String,
    pub settings: MaterialSettings,
    /// Index into `SceneData::textures`
    pub base_color_texture: Option<usize>,
}
