use glam::Vec3;
use thiserror::Error;

/// Capacity of the light list and of the GPU light array.
pub const MAX_POINT_LIGHTS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Vec3::ONE,
            intensity: 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LightListError {
    #[error("light list is full ({MAX_POINT_LIGHTS} lights)")]
    CapacityReached,
    #[error("light index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightList {
    lights: Vec<PointLight>,
}

impl Default for LightList {
    fn default() -> Self {
        Self {
            lights: Vec::with_capacity(MAX_POINT_LIGHTS),
        }
    }
}

impl LightList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_startup_lights() -> Self {
        let mut list = Self::new();
        list.lights.extend([
            PointLight {
                position: Vec3::new(-20.0, 55.5, -30.0),
                color: Vec3::new(1.0, 0.5, 0.5),
                intensity: 50.0,
            },
            PointLight {
                position: Vec3::new(22.0, 11.0, -21.0),
                color: Vec3::ONE,
                intensity: 50.0,
            },
        ]);
        list
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lights.len() >= MAX_POINT_LIGHTS
    }

    pub fn as_slice(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointLight> {
        self.lights.iter()
    }

    pub fn get(&self, index: usize) -> Option<&PointLight> {
        self.lights.get(index)
    }

    /// Appends `light` and returns its index. A full list is left unchanged.
    pub fn add(&mut self, light: PointLight) -> Result<usize, LightListError> {
        if self.is_full() {
            return Err(LightListError::CapacityReached);
        }
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> Result<PointLight, LightListError> {
        self.check_index(index)?;
        Ok(self.lights.remove(index))
    }

    pub fn update(&mut self, index: usize, light: PointLight) -> Result<(), LightListError> {
        self.check_index(index)?;
        self.lights[index] = light;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), LightListError> {
        if index < self.lights.len() {
            Ok(())
        } else {
            Err(LightListError::IndexOutOfRange {
                index,
                len: self.lights.len(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a LightList {
    type Item = &'a PointLight;
    type IntoIter = std::slice::Iter<'a, PointLight>;

    fn into_iter(self) -> Self::IntoIter {
        self.lights.iter()
    }
}

/// Selection after the light at `removed` was taken out of the list, which now
/// holds `new_len` lights.
///
/// Lights after the removed one shift down, so a selection behind it follows
/// its light. Removing the selected light keeps the selection on its index,
/// which now holds the following light; it does not jump to the new last
/// index unless it fell off the end.
pub fn selection_after_remove(
    selected: Option<usize>,
    removed: usize,
    new_len: usize,
) -> Option<usize> {
    if new_len == 0 {
        return None;
    }
    let selected = selected?;
    let selected = if removed < selected { selected - 1 } else { selected };
    Some(selected.min(new_len - 1))
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub _padding: f32,
}

impl From<&PointLight> for GpuPointLight {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.to_array(),
            intensity: light.intensity,
            color: light.color.to_array(),
            _padding: 0.0,
        }
    }
}

/// Uniform block mirroring the light list: a fixed array plus the number of
/// valid entries. Entries past `count` are zero and never read by the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub lights: [GpuPointLight; MAX_POINT_LIGHTS],
    pub count: u32,
    pub _padding: [u32; 3],
}

impl Default for PointLightUniform {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

impl PointLightUniform {
    pub fn from_lights(list: &LightList) -> Self {
        let mut uniform = Self::default();
        for (slot, light) in uniform.lights.iter_mut().zip(list) {
            *slot = light.into();
        }
        uniform.count = list.len() as u32;
        uniform
    }

    pub fn active(&self) -> &[GpuPointLight] {
        &self.lights[..(self.count as usize).min(MAX_POINT_LIGHTS)]
    }
}
