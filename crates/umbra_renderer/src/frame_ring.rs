//! One copy of a uniform block per frame in flight.
//!
//! The CPU only ever writes the slot of the frame it is recording, so the GPU
//! can still be reading the slots of earlier frames.

use bytemuck::Pod;
use wgpu::util::DeviceExt;

pub trait SlotStorage {
    type Uploader: ?Sized;

    fn upload(&self, uploader: &Self::Uploader, bytes: &[u8]);
}

impl SlotStorage for wgpu::Buffer {
    type Uploader = wgpu::Queue;

    fn upload(&self, queue: &wgpu::Queue, bytes: &[u8]) {
        queue.write_buffer(self, 0, bytes);
    }
}

impl SlotStorage for () {
    type Uploader = ();

    fn upload(&self, _: &(), _: &[u8]) {}
}

struct Slot<T, S> {
    data: T,
    storage: S,
}

pub struct FrameRing<T: Pod, S: SlotStorage = wgpu::Buffer> {
    slots: Vec<Slot<T, S>>,
}

impl<T: Pod, S: SlotStorage> FrameRing<T, S> {
    /// Creates `frame_count` zero-initialised slots, `make_storage` is called
    /// once per slot with its index and initial bytes.
    pub fn with_storage(frame_count: usize, mut make_storage: impl FnMut(usize, &[u8]) -> S) -> Self {
        assert!(frame_count > 0, "a frame ring needs at least one slot");

        let slots = (0..frame_count)
            .map(|index| {
                let data = T::zeroed();
                let storage = make_storage(index, bytemuck::bytes_of(&data));
                Slot { data, storage }
            })
            .collect();

        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Overwrites the slot of `frame_index` with `data`.
    ///
    /// Panics if `frame_index` is out of range: the presentation layer and the
    /// ring disagree on the number of frames in flight.
    pub fn update_for_frame(&mut self, uploader: &S::Uploader, frame_index: usize, data: T) {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(frame_index)
            .unwrap_or_else(|| panic!("frame index {frame_index} out of range for a ring of {len}"));

        slot.data = data;
        slot.storage.upload(uploader, bytemuck::bytes_of(&slot.data));
    }

    pub fn slot(&self, frame_index: usize) -> &T {
        &self.slots[frame_index].data
    }

    pub fn storage(&self, frame_index: usize) -> &S {
        &self.slots[frame_index].storage
    }

    pub fn storages(&self) -> impl Iterator<Item = &S> {
        self.slots.iter().map(|slot| &slot.storage)
    }
}

impl<T: Pod> FrameRing<T, wgpu::Buffer> {
    pub fn new(device: &wgpu::Device, frame_count: usize, label: &str) -> Self {
        Self::with_storage(frame_count, |index, contents| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} [{index}]")),
                contents,
                // COPY_DST allows us to write to it every frame
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        })
    }
}

impl<T: Pod> FrameRing<T, ()> {
    pub fn host(frame_count: usize) -> Self {
        Self::with_storage(frame_count, |_, _| ())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        light::{LightList, PointLightUniform},
        scene_uniform::SceneUniform,
    };

    #[test]
    fn update_only_touches_its_slot() {
        let mut ring = FrameRing::<SceneUniform, ()>::host(3);
        let data = SceneUniform::new(glam::Mat4::from_scale(glam::Vec3::splat(2.0)), 1.5);

        ring.update_for_frame(&(), 1, data);

        assert_eq!(*ring.slot(1), data);
        assert_eq!(*ring.slot(0), SceneUniform::default());
        assert_eq!(*ring.slot(2), SceneUniform::default());
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn later_writes_replace_earlier_ones() {
        let mut ring = FrameRing::<PointLightUniform, ()>::host(2);
        let full = PointLightUniform::from_lights(&LightList::with_startup_lights());
        let empty = PointLightUniform::from_lights(&LightList::new());

        ring.update_for_frame(&(), 0, full);
        ring.update_for_frame(&(), 0, empty);
        ring.update_for_frame(&(), 1, full);

        assert_eq!(ring.slot(0).count, 0);
        assert_eq!(*ring.slot(1), full);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn foreign_frame_index_is_fatal() {
        let mut ring = FrameRing::<SceneUniform, ()>::host(2);
        ring.update_for_frame(&(), 2, SceneUniform::default());
    }

    /// Records every upload so the byte stream can be checked.
    struct Recording(RefCell<Vec<u8>>);

    impl SlotStorage for Recording {
        type Uploader = ();

        fn upload(&self, _: &(), bytes: &[u8]) {
            *self.0.borrow_mut() = bytes.to_vec();
        }
    }

    #[test]
    fn storage_receives_the_exact_bytes() {
        let mut ring = FrameRing::<SceneUniform, Recording>::with_storage(2, |_, initial| {
            Recording(RefCell::new(initial.to_vec()))
        });
        assert!(ring.storages().all(|s| s.0.borrow().iter().all(|b| *b == 0)));

        let data = SceneUniform::new(glam::Mat4::IDENTITY, 0.5);
        ring.update_for_frame(&(), 0, data);

        assert_eq!(ring.storage(0).0.borrow().as_slice(), bytemuck::bytes_of(&data));
        assert!(ring.storage(1).0.borrow().iter().all(|b| *b == 0));
    }
}
