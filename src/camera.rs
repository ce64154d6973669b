// ============================================================================
// camera.rs — Ping, Pong!
// Fixed orthographic camera and its GPU uniform.
// ============================================================================

use glam::{Mat4, Vec2};

/// GPU-side camera uniforms, uploaded once at startup.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

/// The camera never moves; both matrices are set once.
#[derive(Clone, Debug)]
pub struct Camera {
    pub projection: Mat4,
    pub view: Mat4,
}

impl Camera {
    /// Orthographic camera showing x in [-w, w], y in [-h, h], z in [-1, 1].
    pub fn orthographic(half_extents: Vec2) -> Self {
        Self {
            projection: Mat4::orthographic_rh(
                -half_extents.x,
                half_extents.x,
                -half_extents.y,
                half_extents.y,
                -1.0,
                1.0,
            ),
            view: Mat4::IDENTITY,
        }
    }

    pub fn uniforms(&self) -> CameraUniforms {
        CameraUniforms {
            projection: self.projection.to_cols_array_2d(),
            view: self.view.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EPS: f32 = 1e-5;

    #[test]
    fn field_corners_map_to_clip_corners() {
        let camera = Camera::orthographic(Vec2::new(5.0, 3.75));
        let clip = camera.projection * camera.view;

        let top_right = clip.project_point3(Vec3::new(5.0, 3.75, 0.0));
        assert!((top_right.x - 1.0).abs() < EPS);
        assert!((top_right.y - 1.0).abs() < EPS);

        let bottom_left = clip.project_point3(Vec3::new(-5.0, -3.75, 0.0));
        assert!((bottom_left.x + 1.0).abs() < EPS);
        assert!((bottom_left.y + 1.0).abs() < EPS);
    }

    #[test]
    fn sprites_at_z_zero_are_inside_depth_range() {
        let camera = Camera::orthographic(Vec2::new(5.0, 3.75));
        let z = camera.projection.project_point3(Vec3::ZERO).z;
        assert!((0.0..=1.0).contains(&z));
    }

    #[test]
    fn uniform_layout_is_two_mat4() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 128);
        let u = Camera::orthographic(Vec2::new(5.0, 3.75)).uniforms();
        assert_eq!(u.view, Mat4::IDENTITY.to_cols_array_2d());
    }
}
