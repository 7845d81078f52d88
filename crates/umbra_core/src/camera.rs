use glam::Mat4;

/// Perspective parameters of the viewer camera.
///
/// The projection is left-handed with a zero-to-one depth range, the
/// convention the shaders and the examiner controller agree on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: 45.0f32.to_radians(),
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn from_degrees(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov: fov_degrees.to_radians(),
            near,
            far,
        }
    }

    /// Computes the projection matrix for a viewport of `width` x `height` pixels.
    pub fn matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_lh(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    /// Reference left-handed, zero-to-one perspective written out by hand.
    fn reference(fov: f32, width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        let h = (0.5 * fov).cos() / (0.5 * fov).sin();
        let w = h * height / width;
        Mat4::from_cols(
            Vec4::new(w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, far / (far - near), 1.0),
            Vec4::new(0.0, 0.0, -(far * near) / (far - near), 0.0),
        )
    }

    #[test]
    fn matches_left_handed_zero_to_one_formula() {
        let projection = Projection::default();
        for (width, height) in [(1280u32, 720u32), (800, 800), (640, 1024)] {
            let expected = reference(
                45.0f32.to_radians(),
                width as f32,
                height as f32,
                0.01,
                1000.0,
            );
            let actual = projection.matrix(width, height);
            assert!(
                actual.abs_diff_eq(expected, 1e-5),
                "{width}x{height}: {actual:?} != {expected:?}"
            );
        }
    }

    #[test]
    fn near_and_far_map_to_zero_and_one() {
        let m = Projection::default().matrix(1920, 1080);
        let near = m * Vec4::new(0.0, 0.0, 0.01, 1.0);
        let far = m * Vec4::new(0.0, 0.0, 1000.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_viewport_stays_finite() {
        let m = Projection::default().matrix(1280, 0);
        assert!(m.is_finite());
    }
}
