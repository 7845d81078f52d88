use glam::{Mat4, Vec3};

/// Axis-aligned bounding box. Starts out empty (inverted).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.extend(p);
        }
        aabb
    }

    fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Maps the box into a canonical volume: centred at the origin with its
    /// longest side scaled to length one. Empty or flat-in-every-axis boxes
    /// are only re-centred.
    pub fn normalization_transform(&self) -> Mat4 {
        if self.is_empty() {
            return Mat4::IDENTITY;
        }

        let longest = self.extent().max_element();
        let scale = if longest > f32::EPSILON {
            1.0 / longest
        } else {
            1.0
        };
        Mat4::from_scale(Vec3::splat(scale)) * Mat4::from_translation(-self.center())
    }
}
